//! Captain Zipcar (workspace facade crate).
//!
//! Re-exports the member crates under short names and holds the pieces the
//! binary and the integration tests share: command-line [`config`], log
//! setup in [`logging`] and the per-frame [`app`] driver.

pub mod app;
pub mod config;
pub mod logging;

pub use zipcar_core as core;
pub use zipcar_input as input;
pub use zipcar_term as term;
pub use zipcar_terrain as terrain;
pub use zipcar_types as types;

pub use app::App;
pub use config::Config;
