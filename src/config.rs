//! Command-line configuration.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::Parser;

use crate::types::{PlayerMode, SCROLLS_PER_STEP};

/// Catch falling stars with Captain Zipcar over a scrolling terrain.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "captain-zipcar", version, about)]
pub struct Config {
    /// Start in two-player mode (the captain follows WASD).
    #[arg(long)]
    pub two_player: bool,

    /// RNG seed for stars and terrain. Defaults to the wall clock.
    #[arg(long, env = "ZIPCAR_SEED")]
    pub seed: Option<u32>,

    /// Frames between terrain row shifts.
    #[arg(long, default_value_t = SCROLLS_PER_STEP,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub cadence: u32,

    /// PNG used as the terrain texture. A procedural one is generated otherwise.
    #[arg(long, value_name = "PNG")]
    pub texture: Option<PathBuf>,

    /// Simulation and render rate.
    #[arg(long, default_value_t = 60,
          value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Append tracing output to this file. Filter with ZIPCAR_LOG.
    #[arg(long, env = "ZIPCAR_LOG_PATH", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn mode(&self) -> PlayerMode {
        if self.two_player {
            PlayerMode::TwoPlayer
        } else {
            PlayerMode::OnePlayer
        }
    }

    /// The configured seed, or one taken from the clock.
    pub fn resolve_seed(&self) -> u32 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
                .unwrap_or(1)
        })
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    /// Frame length in whole milliseconds, as the game clock counts it.
    pub fn frame_ms(&self) -> u32 {
        (self.frame_duration().as_millis() as u32).max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            two_player: false,
            seed: None,
            cadence: SCROLLS_PER_STEP,
            texture: None,
            fps: 60,
            log_file: None,
        }
    }
}
