//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the game.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (game logic, terrain rendering, terminal presentation).
//!
//! # Playfield
//!
//! Entities live in a fixed world coordinate space, independent of the terminal size:
//!
//! - **Width**: 1200 units (x grows to the right)
//! - **Height**: 800 units (y grows downwards)
//! - **Ceiling**: ships and the captain never climb above `y = 50`
//!
//! # Timing
//!
//! The game runs on a fixed timestep:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FRAME_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `SCROLLS_PER_STEP` | 50 | Frames between two height-field row shifts |
//! | `STAR_ANIMATION_FRAME_MS` | 100 | Time each star animation frame stays on screen |
//! | `KEY_RELEASE_TIMEOUT_MS` | 150 | Auto-release for terminals without release events |
//!
//! # Terrain
//!
//! The background height map is a `HEIGHT_MAP_ROWS` x `HEIGHT_MAP_COLS` grid (7x7),
//! which yields 36 quads and 72 triangles per frame.
//!
//! # Examples
//!
//! ```
//! use zipcar_types::{Button, PlayerMode, ZOrder, PLAYFIELD_WIDTH};
//!
//! assert!(ZOrder::Background < ZOrder::Ui);
//! assert_eq!(PlayerMode::default(), PlayerMode::OnePlayer);
//! assert_eq!(Button::ALL[Button::Space.index()], Button::Space);
//! assert_eq!(PLAYFIELD_WIDTH, 1200.0);
//! ```

/// Playfield width in world units.
pub const PLAYFIELD_WIDTH: f32 = 1200.0;

/// Playfield height in world units.
pub const PLAYFIELD_HEIGHT: f32 = 800.0;

/// Smallest y a ship can climb to.
pub const CEILING_Y: f32 = 50.0;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const FRAME_MS: u32 = 16;

/// Height map rows.
pub const HEIGHT_MAP_ROWS: usize = 7;

/// Height map columns.
pub const HEIGHT_MAP_COLS: usize = 7;

/// Frames between two height-field row shifts.
pub const SCROLLS_PER_STEP: u32 = 50;

/// Player starting position.
pub const PLAYER_START: (f32, f32) = (400.0, 500.0);

/// Player movement per frame.
pub const PLAYER_SPEED: f32 = 7.0;

/// Width of the normal starfighter sprite.
pub const PLAYER_SPRITE_WIDTH: f32 = 50.0;

/// Width of the hyper-mode starfighter sprite.
pub const PLAYER_BIG_SPRITE_WIDTH: f32 = 100.0;

/// Collection radius as a fraction of the current sprite width.
pub const PLAYER_PICKUP_FACTOR: f32 = 0.7;

/// Captain starting position.
pub const CAPTAIN_START: (f32, f32) = (400.0, 500.0);

/// Captain movement per frame at normal pace.
pub const CAPTAIN_SPEED: f32 = 3.0;

/// Captain movement per frame when angry.
pub const CAPTAIN_FAST_SPEED: f32 = 12.0;

/// Width of one captain animation tile.
pub const CAPTAIN_SPRITE_WIDTH: f32 = 50.0;

/// Captain collection radius.
pub const CAPTAIN_PICKUP_RADIUS: f32 = 35.0;

/// The captain only chases stars in this window (`y < 400 && x < 600`).
pub const CAPTAIN_CHASE_MAX_Y: f32 = 400.0;
pub const CAPTAIN_CHASE_MAX_X: f32 = 600.0;

/// Points awarded per collected star.
pub const STAR_SCORE: u32 = 10;

/// Stars spawn at `x = rand * STAR_SPAWN_WIDTH`.
pub const STAR_SPAWN_WIDTH: f32 = 800.0;

/// Star fall speed per frame.
pub const STAR_FALL_SPEED: f32 = 5.0;

/// Stars are removed once they reach this y.
pub const STAR_DESPAWN_Y: f32 = 650.0;

/// One in `STAR_SPAWN_CHANCE` frames spawns a new star.
pub const STAR_SPAWN_CHANCE: u32 = 10;

/// Lowest value of each star colour channel.
pub const STAR_MIN_CHANNEL: u8 = 40;

/// Time each star animation frame stays on screen.
pub const STAR_ANIMATION_FRAME_MS: u64 = 100;

/// Number of frames in the star animation.
pub const STAR_ANIMATION_FRAMES: usize = 10;

/// Key auto-release timeout for terminals that never report releases.
pub const KEY_RELEASE_TIMEOUT_MS: u64 = 150;

/// Maximum backing texture edge, in pixels.
pub const MAX_TEXTURE_SIZE: u32 = 1024;

/// Draw order layers, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ZOrder {
    Background,
    Stars,
    Player,
    Captain,
    Ui,
}

impl ZOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZOrder::Background => "background",
            ZOrder::Stars => "stars",
            ZOrder::Player => "player",
            ZOrder::Captain => "captain",
            ZOrder::Ui => "ui",
        }
    }
}

/// One or two human players.
///
/// In one-player mode the captain is driven by the nearest-star heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerMode {
    #[default]
    OnePlayer,
    TwoPlayer,
}

impl PlayerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerMode::OnePlayer => "one",
            PlayerMode::TwoPlayer => "two",
        }
    }
}

/// Logical buttons the game polls every frame.
///
/// Player one uses the arrows and space, player two uses WASD with shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Right,
    Up,
    Down,
    Space,
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    Shift,
    Digit1,
    Digit2,
}

impl Button {
    pub const ALL: [Button; 12] = [
        Button::Left,
        Button::Right,
        Button::Up,
        Button::Down,
        Button::Space,
        Button::KeyW,
        Button::KeyA,
        Button::KeyS,
        Button::KeyD,
        Button::Shift,
        Button::Digit1,
        Button::Digit2,
    ];

    /// Dense index, used for bitsets and fixed arrays.
    pub fn index(&self) -> usize {
        match self {
            Button::Left => 0,
            Button::Right => 1,
            Button::Up => 2,
            Button::Down => 3,
            Button::Space => 4,
            Button::KeyW => 5,
            Button::KeyA => 6,
            Button::KeyS => 7,
            Button::KeyD => 8,
            Button::Shift => 9,
            Button::Digit1 => 10,
            Button::Digit2 => 11,
        }
    }
}

/// Controls for one ship during a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShipControls {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Hyper mode for the player, "go fast" for the captain.
    pub boost: bool,
}

/// Everything the game reads from input during one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameInput {
    pub player: ShipControls,
    pub captain: ShipControls,
    /// A mode switch requested this frame.
    pub mode: Option<PlayerMode>,
}

/// Things that happened during a frame, in place of sound cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Player one picked up a star.
    PlayerCollected,
    /// The captain picked up a star.
    CaptainCollected,
    /// Player one switched into hyper mode.
    HyperEngaged,
    /// The mode changed.
    ModeChanged(PlayerMode),
}
