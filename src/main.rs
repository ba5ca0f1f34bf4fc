//! Captain Zipcar terminal runner (default binary).
//!
//! Fixed-timestep loop: poll input until the next tick, advance one frame,
//! render through the half-block canvas and flush the diff to the terminal.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use tracing::info;

use captain_zipcar::term::{FrameBuffer, TerminalRenderer};
use captain_zipcar::{logging, App, Config};

fn main() -> Result<()> {
    let config = Config::parse();
    logging::init(config.log_file.as_deref())?;

    let (w, h) = TerminalRenderer::size().unwrap_or((80, 24));
    // Load the texture before touching the terminal so errors print normally.
    let mut app = App::new(&config, w, h).context("failed to set up the terrain texture")?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut app, config.frame_duration());

    // Always try to restore terminal state.
    let _ = term.exit();
    info!(
        seed = app.game().seed(),
        player = app.game().player().score(),
        captain = app.game().captain().score(),
        "game over"
    );
    result
}

fn run(term: &mut TerminalRenderer, app: &mut App, tick: Duration) -> Result<()> {
    let start = Instant::now();
    let now_ms = || start.elapsed().as_millis() as u64;

    let mut fb = FrameBuffer::new(0, 0);
    let mut last_tick = Instant::now();
    let mut dirty = true;

    loop {
        if dirty {
            let (w, h) = TerminalRenderer::size().unwrap_or((80, 24));
            fb.resize(w, h);
            app.draw(&mut fb);
            term.draw_swap(&mut fb)?;
            dirty = false;
        }

        // Input with timeout until next tick.
        let timeout = tick
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if app.handle_key(key, now_ms()) {
                        return Ok(());
                    }
                }
                Event::FocusLost => app.release_keys(),
                Event::Resize(..) => {
                    term.invalidate();
                    dirty = true;
                }
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick {
            last_tick = Instant::now();
            app.step(now_ms());
            dirty = true;
        }
    }
}
