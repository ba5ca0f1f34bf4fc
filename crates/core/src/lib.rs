//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the arcade rules: ships, stars, scoring and the
//! per-frame update. It has **zero dependencies** on terminals, graphics or I/O:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: Every rule is covered by unit tests
//! - **Portable**: Runs headless as easily as in a terminal
//!
//! # Module Structure
//!
//! - [`player`]: Player one's starfighter with axis-clamped movement and hyper mode
//! - [`captain`]: The companion character and its nearest-star chase heuristic
//! - [`star`]: Falling, spinning, additively drawn stars
//! - [`game_state`]: Entity ownership and the fixed per-frame update order
//! - [`rng`]: Injectable random sources (seedable LCG, constant source)
//! - [`snapshot`]: Read-only per-frame view for renderers
//!
//! # Example
//!
//! ```
//! use zipcar_core::GameState;
//! use zipcar_types::{FrameInput, ShipControls};
//!
//! let mut game = GameState::new(12345);
//! let input = FrameInput {
//!     player: ShipControls { right: true, ..Default::default() },
//!     ..Default::default()
//! };
//! game.update(&input);
//!
//! assert_eq!(game.player().x(), 407.0);
//! ```

pub mod captain;
pub mod game_state;
pub mod player;
pub mod rng;
pub mod snapshot;
pub mod star;

pub use zipcar_types as types;

// Re-export commonly used types for convenience
pub use captain::{Captain, Facing, Step};
pub use game_state::GameState;
pub use player::Player;
pub use rng::{ConstantSource, RandomSource, SimpleRng};
pub use snapshot::{GameSnapshot, ShipSnapshot};
pub use star::{distance, Star, StarColor};
