//! Falling stars.

use crate::rng::RandomSource;
use crate::types::{
    STAR_ANIMATION_FRAMES, STAR_ANIMATION_FRAME_MS, STAR_DESPAWN_Y, STAR_FALL_SPEED,
    STAR_MIN_CHANNEL, STAR_SPAWN_WIDTH,
};

/// Euclidean distance between two points.
pub fn distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    (x2 - x1).hypot(y2 - y1)
}

/// Opaque star tint; stars are drawn additively so darker channels fade out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StarColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A star falling from the top of the playfield.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub color: StarColor,
}

impl Star {
    pub fn new(x: f32, y: f32, color: StarColor) -> Self {
        Self { x, y, color }
    }

    /// Spawn a star at the top edge with a random tint and column.
    pub fn spawn(rng: &mut impl RandomSource) -> Self {
        let span = 255 - STAR_MIN_CHANNEL as u32;
        let mut channel = || (rng.next_range(span) + STAR_MIN_CHANNEL as u32) as u8;
        let color = StarColor {
            r: channel(),
            g: channel(),
            b: channel(),
        };
        let x = rng.next_unit() * STAR_SPAWN_WIDTH;
        Self { x, y: 0.0, color }
    }

    /// Fall one frame. Returns `false` once the star has left the playfield.
    pub fn update(&mut self) -> bool {
        self.y += STAR_FALL_SPEED;
        self.y < STAR_DESPAWN_Y
    }

    /// Rotation in degrees; stars spin as they fall.
    pub fn angle(&self) -> f32 {
        self.y
    }

    /// Animation frame shown at `elapsed_ms`.
    pub fn animation_frame(elapsed_ms: u64) -> usize {
        ((elapsed_ms / STAR_ANIMATION_FRAME_MS) % STAR_ANIMATION_FRAMES as u64) as usize
    }
}
