//! Player one's starfighter. Always faces north.

use crate::star::{distance, Star};
use crate::types::{
    CEILING_Y, PLAYER_BIG_SPRITE_WIDTH, PLAYER_PICKUP_FACTOR, PLAYER_SPEED, PLAYER_SPRITE_WIDTH,
    PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH, STAR_SCORE,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    x: f32,
    y: f32,
    score: u32,
    speed: f32,
    hyper: bool,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            score: 0,
            speed: PLAYER_SPEED,
            hyper: false,
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

    pub fn is_hyper(&self) -> bool {
        self.hyper
    }

    pub fn move_left(&mut self) {
        self.x = (self.x - self.speed).max(0.0);
    }

    pub fn move_right(&mut self) {
        self.x = (self.x + self.speed).min(PLAYFIELD_WIDTH);
    }

    /// Climb towards the top of the screen.
    pub fn accelerate(&mut self) {
        self.y = (self.y - self.speed).max(CEILING_Y);
    }

    /// Sink towards the bottom of the screen.
    pub fn brake(&mut self) {
        self.y = (self.y + self.speed).min(PLAYFIELD_HEIGHT);
    }

    /// Switch to the big sprite. Returns `true` when this engages hyper mode.
    pub fn hyper_mode(&mut self) -> bool {
        let engaged = !self.hyper;
        self.hyper = true;
        self.speed = PLAYER_SPEED;
        engaged
    }

    pub fn normal_mode(&mut self) {
        self.hyper = false;
        self.speed = PLAYER_SPEED;
    }

    /// Width of the sprite currently shown.
    pub fn sprite_width(&self) -> f32 {
        if self.hyper {
            PLAYER_BIG_SPRITE_WIDTH
        } else {
            PLAYER_SPRITE_WIDTH
        }
    }

    pub fn pickup_radius(&self) -> f32 {
        PLAYER_PICKUP_FACTOR * self.sprite_width()
    }

    /// Remove every star within reach and score it. Returns how many were taken.
    pub fn collect_stars(&mut self, stars: &mut Vec<Star>) -> u32 {
        let radius = self.pickup_radius();
        let before = stars.len();
        stars.retain(|s| distance(self.x, self.y, s.x, s.y) >= radius);
        let taken = (before - stars.len()) as u32;
        self.score += taken * STAR_SCORE;
        taken
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

    #[test]
    fn movement_clamps_to_playfield() {
        let mut p = Player::new(3.0, 52.0);
        p.move_left();
        assert_eq!(p.x(), 0.0);
        p.accelerate();
        assert_eq!(p.y(), CEILING_Y);

        let mut p = Player::new(PLAYFIELD_WIDTH - 1.0, PLAYFIELD_HEIGHT - 1.0);
        p.move_right();
        assert_eq!(p.x(), PLAYFIELD_WIDTH);
        p.brake();
        assert_eq!(p.y(), PLAYFIELD_HEIGHT);
    }

    #[test]
    fn moves_by_speed_per_call() {
        let mut p = Player::new(400.0, 500.0);
        p.move_right();
        p.accelerate();
        assert_eq!((p.x(), p.y()), (407.0, 493.0));
    }

    #[test]
    fn hyper_mode_doubles_pickup_radius() {
        let mut p = Player::new(0.0, 0.0);
        assert_eq!(p.pickup_radius(), 35.0);
        assert!(p.hyper_mode());
        assert!(!p.hyper_mode(), "already engaged");
        assert_eq!(p.pickup_radius(), 70.0);
        p.normal_mode();
        assert!(!p.is_hyper());
    }

    #[test]
    fn collects_only_stars_in_reach() {
        let mut p = Player::new(100.0, 100.0);
        let mut stars = vec![
            Star::new(110.0, 100.0, WHITE),
            Star::new(100.0, 134.0, WHITE),
            Star::new(100.0, 135.0, WHITE),
            Star::new(400.0, 400.0, WHITE),
        ];
        assert_eq!(p.collect_stars(&mut stars), 2);
        assert_eq!(p.score(), 20);
        assert_eq!(stars.len(), 2);
        assert_eq!(stars[0].y, 135.0);
    }
}
