//! Terminal "game renderer" module.
//!
//! This is a small, game-oriented rendering layer for terminal gameplay. It
//! avoids widget toolkits and instead renders into a simple framebuffer that is
//! flushed to the terminal with diffing.
//!
//! Pipeline:
//! - [`raster::Rasterizer`] implements the immediate-mode `Graphics` trait in
//!   software, for the terrain layer
//! - [`canvas::Canvas`] queues z-ordered sprites and text, hosts the raw
//!   graphics layer and composites everything into half-block cells
//! - [`game_view::GameView`] turns a game snapshot into canvas draw calls
//! - [`renderer::TerminalRenderer`] flushes the framebuffer

pub mod canvas;
pub mod fb;
pub mod game_view;
pub mod raster;
pub mod renderer;

pub use zipcar_core as core;
pub use zipcar_terrain as terrain;
pub use zipcar_types as types;

pub use canvas::{Blend, Canvas};
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb, HALF_BLOCK};
pub use game_view::{GameView, Viewport};
pub use raster::Rasterizer;
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
