//! One running game: simulation, terrain and presentation wired together.
//!
//! `App` has no terminal I/O of its own. The binary feeds it key events and
//! ticks, and hands it a framebuffer to fill; tests do the same headlessly.

use crossterm::event::KeyEvent;
use tracing::{debug, info, trace};

use crate::config::Config;
use crate::core::{GameSnapshot, GameState, SimpleRng};
use crate::input::KeyboardState;
use crate::term::{Canvas, FrameBuffer, GameView};
use crate::terrain::{Background, HeightField, Image, TextureAtlas, TextureError};
use crate::types::{GameEvent, ZOrder, HEIGHT_MAP_COLS, HEIGHT_MAP_ROWS, MAX_TEXTURE_SIZE};

/// Edge of the generated terrain texture.
const PROCEDURAL_TEXTURE_SIZE: u32 = 256;

pub struct App {
    game: GameState,
    background: Background,
    canvas: Canvas,
    view: GameView,
    keyboard: KeyboardState,
    snapshot: GameSnapshot,
    /// Triangles drawn by the terrain on the last frame.
    terrain_triangles: usize,
}

impl App {
    /// Build a game from `config`, loading the terrain texture from disk if one
    /// was given.
    pub fn new(config: &Config, cols: u16, rows: u16) -> Result<Self, TextureError> {
        let seed = config.resolve_seed();
        let image = match &config.texture {
            Some(path) => Image::load_tileable(path)?,
            None => Image::procedural_earth(PROCEDURAL_TEXTURE_SIZE, PROCEDURAL_TEXTURE_SIZE, seed),
        };
        Ok(Self::with_image(config, seed, &image, cols, rows))
    }

    pub fn with_image(config: &Config, seed: u32, image: &Image, cols: u16, rows: u16) -> Self {
        let mut atlas = TextureAtlas::new(MAX_TEXTURE_SIZE);
        let handle = atlas.insert(image);
        let field = HeightField::with_cadence(
            HEIGHT_MAP_ROWS,
            HEIGHT_MAP_COLS,
            config.cadence,
            SimpleRng::new(seed),
        );
        info!(
            seed,
            cadence = config.cadence,
            mode = config.mode().as_str(),
            texture = image.width(),
            "new game"
        );
        Self {
            game: GameState::new(seed)
                .with_mode(config.mode())
                .with_frame_ms(config.frame_ms()),
            background: Background::new(field, handle),
            canvas: Canvas::new(cols, rows, atlas),
            view: GameView::new(),
            keyboard: KeyboardState::new(),
            snapshot: GameSnapshot::default(),
            terrain_triangles: 0,
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn terrain_triangles(&self) -> usize {
        self.terrain_triangles
    }

    /// Feed a key event. Returns `true` when the player asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent, now_ms: u64) -> bool {
        self.keyboard.handle_key_event(key, now_ms)
    }

    /// Forget held keys. Releases sent while the terminal is unfocused never
    /// reach us.
    pub fn release_keys(&mut self) {
        debug!("releasing held keys");
        self.keyboard.release_all();
    }

    /// Advance one fixed frame: game entities first, then the terrain scroll.
    pub fn step(&mut self, now_ms: u64) {
        let input = self.keyboard.frame_input(now_ms);
        self.game.update(&input);
        self.background.scroll();

        for event in self.game.drain_events() {
            match event {
                GameEvent::ModeChanged(mode) => info!(mode = mode.as_str(), "mode switched"),
                GameEvent::HyperEngaged => debug!("hyper mode engaged"),
                GameEvent::PlayerCollected | GameEvent::CaptainCollected => {
                    trace!(?event, "star collected")
                }
            }
        }
    }

    /// Render the current state into `fb`, resizing the canvas to match it.
    pub fn draw(&mut self, fb: &mut FrameBuffer) {
        self.canvas.resize(fb.width(), fb.height());
        self.terrain_triangles = self.background.draw(&mut self.canvas, ZOrder::Background);
        self.game.snapshot_into(&mut self.snapshot);
        self.view.draw(&self.snapshot, &mut self.canvas);
        self.canvas.present(fb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlayerMode;
    use crossterm::event::KeyCode;

    fn app() -> App {
        let config = Config {
            seed: Some(7),
            ..Config::default()
        };
        App::new(&config, 80, 24).unwrap()
    }

    #[test]
    fn draw_fills_the_framebuffer_with_terrain_and_hud() {
        let mut app = app();
        let mut fb = FrameBuffer::new(80, 24);
        app.draw(&mut fb);
        assert_eq!(app.terrain_triangles(), 72);
        assert!(fb.row_text(1).contains("Score: 0"));
    }

    #[test]
    fn step_scrolls_the_terrain_once_per_frame() {
        let mut app = app();
        for t in 0..3 {
            app.step(t * 16);
        }
        assert_eq!(app.background().field().phase(), 3);
        assert_eq!(app.game().frame(), 3);
    }

    #[test]
    fn digit_keys_switch_modes() {
        let mut app = app();
        assert!(!app.handle_key(KeyEvent::from(KeyCode::Char('2')), 0));
        app.step(0);
        assert_eq!(app.game().mode(), PlayerMode::TwoPlayer);
        assert!(app.handle_key(KeyEvent::from(KeyCode::Esc), 1));
    }

    #[test]
    fn game_clock_runs_at_the_configured_rate() {
        let config = Config {
            seed: Some(7),
            fps: 30,
            ..Config::default()
        };
        let mut app = App::new(&config, 80, 24).unwrap();
        app.step(0);
        app.step(33);
        assert_eq!(app.game().elapsed_ms(), 66);
    }

    #[test]
    fn losing_focus_drops_held_keys() {
        let mut app = app();
        app.handle_key(KeyEvent::from(KeyCode::Right), 0);
        app.release_keys();
        app.step(16);
        assert_eq!(app.game().player().x(), 400.0);
    }

    #[test]
    fn missing_texture_file_is_an_error() {
        let config = Config {
            texture: Some("/nonexistent/earth.png".into()),
            ..Config::default()
        };
        assert!(App::new(&config, 80, 24).is_err());
    }
}
