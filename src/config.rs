//! Runner configuration from environment variables.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `BLOCKTRIS_LEVEL` | starting level | 1 |
//! | `BLOCKTRIS_GRID` | grid size as `WxH` | `10x22` |
//! | `BLOCKTRIS_INVERT_ROTATION` | `1`/`true` reverses the rotation cycle | off |
//! | `BLOCKTRIS_STARTING_HEIGHT` | garbage height in tenths of the grid | 0 |
//! | `BLOCKTRIS_SEED` | RNG seed | clock derived |
//! | `BLOCKTRIS_SAVE_PATH` | save file, empty disables saving | `blocktris-save.json` |
//!
//! Unparseable values fall back to the default. Range checks are left to
//! [`GameOptions::validate`].

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::core::GameOptions;

pub const DEFAULT_SAVE_PATH: &str = "blocktris-save.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub options: GameOptions,
    pub seed: u32,
    pub save_path: Option<PathBuf>,
}

impl RunnerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = GameOptions::default();

        let level = lookup("BLOCKTRIS_LEVEL")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.level);

        let (grid_width, grid_height) = lookup("BLOCKTRIS_GRID")
            .and_then(|s| parse_grid(&s))
            .unwrap_or((defaults.grid_width, defaults.grid_height));

        let invert_rotation = lookup("BLOCKTRIS_INVERT_ROTATION")
            .map(|s| matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.invert_rotation);

        let starting_height_percent = lookup("BLOCKTRIS_STARTING_HEIGHT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.starting_height_percent);

        let seed = lookup("BLOCKTRIS_SEED")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_else(clock_seed);

        let save_path = match lookup("BLOCKTRIS_SAVE_PATH") {
            Some(s) if s.trim().is_empty() => None,
            Some(s) => Some(PathBuf::from(s.trim())),
            None => Some(PathBuf::from(DEFAULT_SAVE_PATH)),
        };

        Self {
            options: GameOptions {
                level,
                grid_width,
                grid_height,
                invert_rotation,
                starting_height_percent,
            },
            seed,
            save_path,
        }
    }
}

fn parse_grid(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.trim().split_once(|c: char| c == 'x' || c == 'X')?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
