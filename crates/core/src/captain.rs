//! Captain Zipcar, the companion character.
//!
//! Player two in two-player mode; otherwise driven by a single heuristic:
//! chase the nearest star in the upper-left chase window, one axis at a time.

use crate::star::{distance, Star};
use crate::types::{
    CAPTAIN_CHASE_MAX_X, CAPTAIN_CHASE_MAX_Y, CAPTAIN_FAST_SPEED, CAPTAIN_PICKUP_RADIUS,
    CAPTAIN_SPEED, CEILING_Y, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH, STAR_SCORE,
};

/// Which way the sprite is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Left,
    Right,
}

/// One step chosen by the chase heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Captain {
    x: f32,
    y: f32,
    facing: Facing,
    score: u32,
    speed: f32,
    angry: bool,
    /// Position of the star chased during the last AI step.
    target: Option<(f32, f32)>,
}

impl Captain {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            facing: Facing::Left,
            score: 0,
            speed: CAPTAIN_SPEED,
            angry: false,
            target: None,
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn is_angry(&self) -> bool {
        self.angry
    }

    pub fn target(&self) -> Option<(f32, f32)> {
        self.target
    }

    pub fn go_fast(&mut self) {
        self.speed = CAPTAIN_FAST_SPEED;
        self.angry = true;
    }

    pub fn go_normal(&mut self) {
        self.speed = CAPTAIN_SPEED;
        self.angry = false;
    }

    pub fn move_left(&mut self) {
        self.facing = Facing::Left;
        self.x = (self.x - self.speed).max(0.0);
    }

    pub fn move_right(&mut self) {
        self.facing = Facing::Right;
        self.x = (self.x + self.speed).min(PLAYFIELD_WIDTH);
    }

    pub fn move_up(&mut self) {
        self.y = (self.y - self.speed).max(CEILING_Y);
    }

    pub fn move_down(&mut self) {
        self.y = (self.y + self.speed).min(PLAYFIELD_HEIGHT);
    }

    pub fn apply_step(&mut self, step: Step) {
        match step {
            Step::Left => self.move_left(),
            Step::Right => self.move_right(),
            Step::Up => self.move_up(),
            Step::Down => self.move_down(),
        }
    }

    /// Nearest star inside the chase window, if any.
    pub fn closest_star<'a>(&self, stars: &'a [Star]) -> Option<&'a Star> {
        stars
            .iter()
            .filter(|s| s.y < CAPTAIN_CHASE_MAX_Y && s.x < CAPTAIN_CHASE_MAX_X)
            .min_by(|a, b| {
                let da = distance(self.x, self.y, a.x, a.y);
                let db = distance(self.x, self.y, b.x, b.y);
                da.total_cmp(&db)
            })
    }

    /// Step along the axis with the larger gap; ties go horizontal.
    pub fn step_toward(&self, tx: f32, ty: f32) -> Step {
        let y_diff = ty - self.y;
        let x_diff = tx - self.x;
        if y_diff.abs() > x_diff.abs() {
            if y_diff > 0.0 {
                Step::Down
            } else {
                Step::Up
            }
        } else if x_diff > 0.0 {
            Step::Right
        } else {
            Step::Left
        }
    }

    /// Run one AI step. Does nothing when no star is in the chase window.
    pub fn move_toward_closest_star(&mut self, stars: &[Star]) -> Option<Step> {
        self.target = self.closest_star(stars).map(|s| (s.x, s.y));
        let (tx, ty) = self.target?;
        let step = self.step_toward(tx, ty);
        self.apply_step(step);
        Some(step)
    }

    pub fn pickup_radius(&self) -> f32 {
        CAPTAIN_PICKUP_RADIUS
    }

    /// Remove every star within reach and score it. Returns how many were taken.
    pub fn collect_stars(&mut self, stars: &mut Vec<Star>) -> u32 {
        let before = stars.len();
        stars.retain(|s| distance(self.x, self.y, s.x, s.y) >= CAPTAIN_PICKUP_RADIUS);
        let taken = (before - stars.len()) as u32;
        self.score += taken * STAR_SCORE;
        taken
    }
}
