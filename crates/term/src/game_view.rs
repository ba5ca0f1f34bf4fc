//! GameView: maps a `core::GameSnapshot` onto a [`Canvas`].
//!
//! This module is pure (no I/O). World units are scaled to whatever pixel size
//! the canvas has, so the playfield always fills the terminal.

use crate::canvas::Canvas;
use crate::core::{Facing, GameSnapshot, ShipSnapshot, Star};
use crate::fb::{CellStyle, Rgb};
use crate::types::{
    PlayerMode, ZOrder, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH, STAR_ANIMATION_FRAMES,
};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// World-space size of a star's arms.
const STAR_RADIUS: f32 = 25.0;

const PLAYER_BODY: Rgb = Rgb::new(80, 220, 220);
const PLAYER_JET: Rgb = Rgb::new(255, 140, 30);
const CAPTAIN_BODY: Rgb = Rgb::new(230, 150, 70);
const CAPTAIN_ANGRY: Rgb = Rgb::new(240, 60, 50);
const CAPTAIN_HEAD: Rgb = Rgb::new(250, 220, 180);

pub const ONE_PLAYER_LINE: &str = "One player mode (press '2' to switch)";
pub const TWO_PLAYER_LINE: &str = "Two player mode (press '1' to switch)";
pub const PLAYER_ONE_HINT: &str = "PLAYER ONE: ARROWS + SPACE";
pub const PLAYER_TWO_HINT: &str = "PLAYER TWO: WASD + SHIFT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameView {
    hide_hud: bool,
}

impl GameView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw only the playfield, without text.
    pub fn without_hud(mut self) -> Self {
        self.hide_hud = true;
        self
    }

    /// Queue sprites and HUD text for one frame.
    ///
    /// The terrain is drawn separately through the canvas's raw graphics layer.
    pub fn draw(&self, snap: &GameSnapshot, canvas: &mut Canvas) {
        let scale = Scale::for_canvas(canvas);

        let frame = Star::animation_frame(snap.elapsed_ms);
        for star in &snap.stars {
            self.draw_star(canvas, scale, star, frame);
        }
        self.draw_player(canvas, scale, &snap.player);
        self.draw_captain(canvas, scale, &snap.captain, snap.captain_facing);

        if !self.hide_hud {
            self.draw_hud(canvas, snap);
        }
    }

    fn draw_star(&self, canvas: &mut Canvas, scale: Scale, star: &Star, frame: usize) {
        let (cx, cy) = scale.point(star.x, star.y);
        // Arms pulse with the animation frame.
        let pulse = 0.6 + 0.4 * frame as f32 / (STAR_ANIMATION_FRAMES - 1) as f32;
        let radius = (STAR_RADIUS * scale.x * pulse).max(1.0);
        let color = Rgb::new(star.color.r, star.color.g, star.color.b);
        canvas.spark(ZOrder::Stars, cx, cy, radius, star.angle(), color);
    }

    fn draw_player(&self, canvas: &mut Canvas, scale: Scale, ship: &ShipSnapshot) {
        let (x, y, w, h) = scale.sprite(ship.x, ship.y, ship.sprite_width, 0.6);
        canvas.fill_rect(ZOrder::Player, x, y, w, h, PLAYER_BODY);
        if ship.boosted {
            let jet_h = (h / 2).max(1);
            let jet_x = x + w as i32 / 4;
            let jet_y = y + h as i32;
            canvas.add_rect(ZOrder::Player, jet_x, jet_y, (w / 2).max(1), jet_h, PLAYER_JET);
        }
    }

    fn draw_captain(
        &self,
        canvas: &mut Canvas,
        scale: Scale,
        ship: &ShipSnapshot,
        facing: Facing,
    ) {
        let (x, y, w, h) = scale.sprite(ship.x, ship.y, ship.sprite_width, 1.0);
        let body = if ship.boosted { CAPTAIN_ANGRY } else { CAPTAIN_BODY };
        canvas.fill_rect(ZOrder::Captain, x, y, w, h, body);
        let head_w = (w / 3).max(1);
        let head_x = match facing {
            Facing::Left => x,
            Facing::Right => x + (w - head_w) as i32,
        };
        canvas.fill_rect(ZOrder::Captain, head_x, y, head_w, (h / 3).max(1), CAPTAIN_HEAD);
    }

    fn draw_hud(&self, canvas: &mut Canvas, snap: &GameSnapshot) {
        let style = CellStyle::new(Rgb::YELLOW, Rgb::BLACK).bold();
        let (cols, rows) = canvas.cell_size();

        let mode_line = match snap.mode {
            PlayerMode::OnePlayer => ONE_PLAYER_LINE,
            PlayerMode::TwoPlayer => TWO_PLAYER_LINE,
        };
        canvas.text(ZOrder::Ui, 1, 0, mode_line, style);
        canvas.text(ZOrder::Ui, 1, 1, format!("Score: {}", snap.player.score), style);
        let captain_line = format!("CPT ZIPCAR Score: {}", snap.captain.score);
        canvas.text(ZOrder::Ui, 1, 2, captain_line, style);

        let bottom = rows.saturating_sub(1);
        canvas.text(ZOrder::Ui, 1, bottom, PLAYER_ONE_HINT, style);
        if snap.mode == PlayerMode::TwoPlayer {
            let len = PLAYER_TWO_HINT.chars().count() as u16;
            let col = cols.saturating_sub(len + 1);
            canvas.text(ZOrder::Ui, col, bottom, PLAYER_TWO_HINT, style);
        }
    }
}

/// World units to canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Scale {
    x: f32,
    y: f32,
}

impl Scale {
    fn for_canvas(canvas: &Canvas) -> Self {
        let (pw, ph) = canvas.pixel_size();
        Self {
            x: pw as f32 / PLAYFIELD_WIDTH,
            y: ph as f32 / PLAYFIELD_HEIGHT,
        }
    }

    fn point(self, x: f32, y: f32) -> (f32, f32) {
        (x * self.x, y * self.y)
    }

    /// Box centred on `(x, y)`, `width` world units wide and `aspect * width` tall.
    fn sprite(self, x: f32, y: f32, width: f32, aspect: f32) -> (i32, i32, u32, u32) {
        let w = (width * self.x).round().max(1.0);
        let h = (width * aspect * self.y).round().max(1.0);
        let (cx, cy) = self.point(x, y);
        (
            (cx - w / 2.0).round() as i32,
            (cy - h / 2.0).round() as i32,
            w as u32,
            h as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameState;
    use crate::fb::FrameBuffer;
    use zipcar_terrain::texture::TextureAtlas;

    fn render(snap: &GameSnapshot, vp: Viewport) -> FrameBuffer {
        let mut canvas = Canvas::new(vp.width, vp.height, TextureAtlas::default());
        let mut fb = FrameBuffer::new(vp.width, vp.height);
        GameView::new().draw(snap, &mut canvas);
        canvas.present(&mut fb);
        fb
    }

    #[test]
    fn hud_shows_mode_and_both_scores() {
        let mut snap = GameState::new(1).snapshot();
        snap.player.score = 30;
        snap.captain.score = 120;
        let fb = render(&snap, Viewport::new(80, 24));
        assert!(fb.row_text(0).contains(ONE_PLAYER_LINE));
        assert!(fb.row_text(1).contains("Score: 30"));
        assert!(fb.row_text(2).contains("CPT ZIPCAR Score: 120"));
        assert!(fb.row_text(23).contains(PLAYER_ONE_HINT));
        assert!(!fb.row_text(23).contains(PLAYER_TWO_HINT));
    }

    #[test]
    fn two_player_mode_adds_second_hint() {
        let mut snap = GameState::new(1).snapshot();
        snap.mode = PlayerMode::TwoPlayer;
        let fb = render(&snap, Viewport::new(80, 24));
        assert!(fb.row_text(0).contains(TWO_PLAYER_LINE));
        let bottom = fb.row_text(23);
        assert!(bottom.contains(PLAYER_ONE_HINT));
        assert!(bottom.contains(PLAYER_TWO_HINT));
    }

    #[test]
    fn sprite_boxes_scale_with_the_canvas() {
        let s = Scale { x: 0.1, y: 0.1 };
        assert_eq!(s.sprite(400.0, 500.0, 50.0, 1.0), (38, 48, 5, 5));
        assert_eq!(s.sprite(400.0, 500.0, 100.0, 1.0).2, 10);
    }

    #[test]
    fn captain_draws_over_player_at_the_shared_start() {
        let snap = GameState::new(1).snapshot();
        let fb = render(&snap, Viewport::new(120, 40));
        // 120 x 80 pixels: both start centred on pixel (40, 50), cell row 25.
        assert_eq!(fb.get(40, 25).unwrap().style.fg, CAPTAIN_BODY);
    }

    #[test]
    fn hyper_mode_adds_a_jet_below_the_player() {
        let mut snap = GameState::new(1).snapshot();
        snap.captain.x = 1000.0;
        snap.player.boosted = true;
        snap.player.sprite_width = 100.0;
        let fb = render(&snap, Viewport::new(120, 40));
        // Body is 10 x 6 pixels at (35, 47); the jet starts on pixel row 53.
        let jet = fb.get(40, 26).unwrap();
        assert_eq!(jet.style.bg, PLAYER_JET);
    }

    #[test]
    fn stars_use_their_own_tint() {
        let mut snap = GameSnapshot::default();
        snap.stars.push(Star::new(
            600.0,
            200.0,
            crate::core::StarColor {
                r: 200,
                g: 100,
                b: 50,
            },
        ));
        let mut canvas = Canvas::new(120, 40, TextureAtlas::default());
        let mut fb = FrameBuffer::new(120, 40);
        GameView::new().without_hud().draw(&snap, &mut canvas);
        canvas.present(&mut fb);
        // Star centre at pixel (60, 20) -> cell (60, 10), top half.
        assert_eq!(fb.get(60, 10).unwrap().style.fg, Rgb::new(200, 100, 50));
    }
}
