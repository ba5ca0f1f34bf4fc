//! Game state module - owns every entity and runs the per-frame update
//!
//! This module ties together the player, the captain, the falling stars and the
//! RNG. The terrain background is owned by the driver and advanced alongside
//! [`GameState::update`].

use crate::captain::Captain;
use crate::player::Player;
use crate::rng::{RandomSource, SimpleRng};
use crate::snapshot::{GameSnapshot, ShipSnapshot};
use crate::star::Star;
use crate::types::*;

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    player: Player,
    captain: Captain,
    stars: Vec<Star>,
    mode: PlayerMode,
    rng: SimpleRng,
    seed: u32,
    frame: u64,
    frame_ms: u32,
    elapsed_ms: u64,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self {
            player: Player::new(PLAYER_START.0, PLAYER_START.1),
            captain: Captain::new(CAPTAIN_START.0, CAPTAIN_START.1),
            stars: Vec::new(),
            mode: PlayerMode::OnePlayer,
            rng: SimpleRng::new(seed),
            seed,
            frame: 0,
            frame_ms: FRAME_MS,
            elapsed_ms: 0,
            events: Vec::new(),
        }
    }

    pub fn with_mode(mut self, mode: PlayerMode) -> Self {
        self.mode = mode;
        self
    }

    /// Game time added by each [`update`](Self::update). Clamped to at least 1 ms.
    pub fn with_frame_ms(mut self, frame_ms: u32) -> Self {
        self.frame_ms = frame_ms.max(1);
        self
    }

    pub fn frame_ms(&self) -> u32 {
        self.frame_ms
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn captain(&self) -> &Captain {
        &self.captain
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Mutable star list, for scripted scenarios.
    pub fn stars_mut(&mut self) -> &mut Vec<Star> {
        &mut self.stars
    }

    pub fn mode(&self) -> PlayerMode {
        self.mode
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Events raised since the last drain.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Advance one fixed frame.
    ///
    /// Order matters and follows the arcade original: collections first (so a
    /// star touched last frame is scored before anything moves), then controls,
    /// then mode switches, then the stars fall, then maybe a new star spawns.
    pub fn update(&mut self, input: &FrameInput) {
        self.frame += 1;
        self.elapsed_ms += self.frame_ms as u64;

        for _ in 0..self.player.collect_stars(&mut self.stars) {
            self.events.push(GameEvent::PlayerCollected);
        }
        for _ in 0..self.captain.collect_stars(&mut self.stars) {
            self.events.push(GameEvent::CaptainCollected);
        }

        self.steer_player(&input.player);
        match self.mode {
            PlayerMode::TwoPlayer => self.steer_captain(&input.captain),
            PlayerMode::OnePlayer => {
                if self.player.score() > self.captain.score() {
                    self.captain.go_fast();
                } else {
                    self.captain.go_normal();
                }
                self.captain.move_toward_closest_star(&self.stars);
            }
        }

        if let Some(mode) = input.mode {
            self.set_mode(mode);
        }

        self.stars.retain_mut(|s| s.update());

        if self.rng.next_range(STAR_SPAWN_CHANCE) == 0 {
            let star = Star::spawn(&mut self.rng);
            self.stars.push(star);
        }
    }

    pub fn set_mode(&mut self, mode: PlayerMode) {
        if self.mode != mode {
            self.mode = mode;
            self.events.push(GameEvent::ModeChanged(mode));
        }
    }

    fn steer_player(&mut self, c: &ShipControls) {
        if c.left {
            self.player.move_left();
        }
        if c.right {
            self.player.move_right();
        }
        if c.up {
            self.player.accelerate();
        }
        if c.down {
            self.player.brake();
        }
        if c.boost {
            if self.player.hyper_mode() {
                self.events.push(GameEvent::HyperEngaged);
            }
        } else {
            self.player.normal_mode();
        }
    }

    fn steer_captain(&mut self, c: &ShipControls) {
        if c.left {
            self.captain.move_left();
        }
        if c.right {
            self.captain.move_right();
        }
        if c.up {
            self.captain.move_up();
        }
        if c.down {
            self.captain.move_down();
        }
        if c.boost {
            self.captain.go_fast();
        } else {
            self.captain.go_normal();
        }
    }

    /// Capture everything the views need for one frame.
    pub fn snapshot(&self) -> GameSnapshot {
        let mut snap = GameSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    /// Fill `out` in place so callers can reuse its star buffer.
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.player = ShipSnapshot {
            x: self.player.x(),
            y: self.player.y(),
            score: self.player.score(),
            boosted: self.player.is_hyper(),
            sprite_width: self.player.sprite_width(),
        };
        out.captain = ShipSnapshot {
            x: self.captain.x(),
            y: self.captain.y(),
            score: self.captain.score(),
            boosted: self.captain.is_angry(),
            sprite_width: CAPTAIN_SPRITE_WIDTH,
        };
        out.captain_facing = self.captain.facing();
        out.stars.clear();
        out.stars.extend_from_slice(&self.stars);
        out.mode = self.mode;
        out.frame = self.frame;
        out.elapsed_ms = self.elapsed_ms;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::star::StarColor;

    const WHITE: StarColor = StarColor {
        r: 255,
        g: 255,
        b: 255,
    };

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    #[test]
    fn new_game_starts_in_one_player_mode_with_no_stars() {
        let gs = GameState::new(1);
        assert_eq!(gs.mode(), PlayerMode::OnePlayer);
        assert!(gs.stars().is_empty());
        assert_eq!(gs.player().score(), 0);
        assert_eq!(gs.captain().score(), 0);
    }

    #[test]
    fn update_is_deterministic_for_a_seed() {
        let mut a = GameState::new(77);
        let mut b = GameState::new(77);
        for _ in 0..300 {
            a.update(&idle());
            b.update(&idle());
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn stars_spawn_roughly_one_in_ten_frames() {
        let mut gs = GameState::new(5);
        let mut spawned = 0;
        for _ in 0..1000 {
            gs.stars_mut().clear();
            gs.update(&idle());
            spawned += gs.stars().len();
        }
        assert!((50..=150).contains(&spawned), "spawned {spawned}");
    }

    #[test]
    fn player_collects_before_moving() {
        let mut gs = GameState::new(1).with_mode(PlayerMode::TwoPlayer);
        gs.stars_mut().push(Star::new(400.0, 520.0, WHITE));
        let input = FrameInput {
            player: ShipControls {
                left: true,
                ..Default::default()
            },
            ..Default::default()
        };
        gs.update(&input);
        assert_eq!(gs.player().score(), STAR_SCORE);
        assert_eq!(gs.captain().score(), 0);
        assert_eq!(gs.player().x(), 393.0);
        assert!(gs.events().contains(&GameEvent::PlayerCollected));
    }

    #[test]
    fn two_player_mode_steers_captain_from_input() {
        let mut gs = GameState::new(1).with_mode(PlayerMode::TwoPlayer);
        let input = FrameInput {
            captain: ShipControls {
                right: true,
                boost: true,
                ..Default::default()
            },
            ..Default::default()
        };
        // Moves at the old speed, then speeds up for the next frame.
        gs.update(&input);
        assert_eq!(gs.captain().x(), 403.0);
        assert!(gs.captain().is_angry());
        gs.update(&input);
        assert_eq!(gs.captain().x(), 415.0);
    }

    #[test]
    fn game_clock_follows_the_frame_length() {
        let mut gs = GameState::new(1);
        gs.update(&idle());
        assert_eq!(gs.elapsed_ms(), FRAME_MS as u64);

        let mut slow = GameState::new(1).with_frame_ms(33);
        for _ in 0..3 {
            slow.update(&idle());
        }
        assert_eq!(slow.elapsed_ms(), 99);
        assert_eq!(slow.snapshot().elapsed_ms, 99);
        assert_eq!(GameState::new(1).with_frame_ms(0).frame_ms(), 1);
    }

    #[test]
    fn one_player_mode_ignores_captain_input() {
        let mut gs = GameState::new(1);
        let input = FrameInput {
            captain: ShipControls {
                right: true,
                ..Default::default()
            },
            ..Default::default()
        };
        gs.update(&input);
        // No stars in the chase window yet, so the captain stays put.
        assert_eq!(gs.captain().x(), CAPTAIN_START.0);
    }

    #[test]
    fn captain_gets_angry_when_player_leads() {
        let mut gs = GameState::new(1);
        gs.stars_mut().push(Star::new(400.0, 520.0, WHITE));
        gs.update(&idle());
        assert!(gs.player().score() > gs.captain().score());
        gs.update(&idle());
        assert!(gs.captain().is_angry());
        assert_eq!(gs.captain().speed(), CAPTAIN_FAST_SPEED);
    }

    #[test]
    fn mode_switch_raises_event_once() {
        let mut gs = GameState::new(1);
        let input = FrameInput {
            mode: Some(PlayerMode::TwoPlayer),
            ..Default::default()
        };
        gs.update(&input);
        gs.update(&input);
        let switches = gs
            .drain_events()
            .filter(|e| matches!(e, GameEvent::ModeChanged(_)))
            .count();
        assert_eq!(switches, 1);
        assert_eq!(gs.mode(), PlayerMode::TwoPlayer);
        assert!(gs.events().is_empty());
    }

    #[test]
    fn hyper_event_fires_on_engage_only() {
        let mut gs = GameState::new(1);
        let boost = FrameInput {
            player: ShipControls {
                boost: true,
                ..Default::default()
            },
            ..Default::default()
        };
        gs.update(&boost);
        gs.update(&boost);
        gs.update(&idle());
        gs.update(&boost);
        let engaged = gs
            .events()
            .iter()
            .filter(|e| **e == GameEvent::HyperEngaged)
            .count();
        assert_eq!(engaged, 2);
    }

    #[test]
    fn stars_fall_and_expire() {
        let mut gs = GameState::new(1);
        gs.stars_mut().push(Star::new(1100.0, 645.0, WHITE));
        gs.stars_mut().push(Star::new(1100.0, 100.0, WHITE));
        gs.update(&idle());
        let survivors: Vec<_> = gs.stars().iter().filter(|s| s.x == 1100.0).collect();
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].y, 105.0);
    }

    #[test]
    fn frame_clock_advances_by_fixed_step() {
        let mut gs = GameState::new(1);
        for _ in 0..10 {
            gs.update(&idle());
        }
        assert_eq!(gs.frame(), 10);
        assert_eq!(gs.elapsed_ms(), 10 * FRAME_MS as u64);
    }
}
