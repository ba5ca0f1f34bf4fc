//! Terminal input module.
//!
//! This module is independent of any UI framework. It maps `crossterm` key
//! events onto the game's [`Button`](crate::types::Button) set and keeps a
//! held-button state that works in terminals without key-release events.

pub mod keyboard;
pub mod map;

pub use zipcar_types as types;

pub use keyboard::KeyboardState;
pub use map::{map_key, should_quit, KeyMapping};
