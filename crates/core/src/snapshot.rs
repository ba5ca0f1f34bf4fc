use crate::captain::Facing;
use crate::star::Star;
use crate::types::PlayerMode;

/// Position and status of one ship.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShipSnapshot {
    pub x: f32,
    pub y: f32,
    pub score: u32,
    /// Hyper mode for the player, angry for the captain.
    pub boosted: bool,
    pub sprite_width: f32,
}

/// Read-only view of a frame, consumed by renderers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GameSnapshot {
    pub player: ShipSnapshot,
    pub captain: ShipSnapshot,
    pub captain_facing: Facing,
    pub stars: Vec<Star>,
    pub mode: PlayerMode,
    pub frame: u64,
    pub elapsed_ms: u64,
}
