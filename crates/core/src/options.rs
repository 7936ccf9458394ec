//! Options module - per-game settings owned by the controller

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{
    DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, MAX_GRID_DIMENSION, MAX_STARTING_HEIGHT,
    MIN_GRID_DIMENSION, SPAWN_ROWS,
};

/// Settings fixed for the lifetime of a [`crate::Game`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOptions {
    /// Starting level, at least 1
    pub level: u32,
    pub grid_width: u32,
    pub grid_height: u32,
    /// Rotate through the states in the opposite direction
    pub invert_rotation: bool,
    /// Pre-filled garbage height in tenths of the grid (0..=10)
    pub starting_height_percent: u32,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            level: 1,
            grid_width: DEFAULT_GRID_WIDTH,
            grid_height: DEFAULT_GRID_HEIGHT,
            invert_rotation: false,
            starting_height_percent: 0,
        }
    }
}

impl GameOptions {
    /// Check every field. A controller must only be built from validated options.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.level == 0 {
            return Err(OptionsError::LevelTooLow);
        }
        let dims = MIN_GRID_DIMENSION..=MAX_GRID_DIMENSION;
        if !dims.contains(&self.grid_width) {
            return Err(OptionsError::WidthOutOfRange(self.grid_width));
        }
        if !dims.contains(&self.grid_height) {
            return Err(OptionsError::HeightOutOfRange(self.grid_height));
        }
        if self.starting_height_percent > MAX_STARTING_HEIGHT {
            return Err(OptionsError::StartingHeightOutOfRange(
                self.starting_height_percent,
            ));
        }
        Ok(())
    }

    /// Number of garbage rows filled at the start of a new game.
    ///
    /// Never reaches into the top [`SPAWN_ROWS`] rows, so the first spawn fits.
    pub fn starting_rows(&self) -> u32 {
        let rows = self.starting_height_percent.min(MAX_STARTING_HEIGHT) * self.grid_height / 10;
        rows.min(self.grid_height.saturating_sub(SPAWN_ROWS))
    }
}

/// Rejected [`GameOptions`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsError {
    /// Level must be at least 1
    LevelTooLow,
    WidthOutOfRange(u32),
    HeightOutOfRange(u32),
    StartingHeightOutOfRange(u32),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsError::LevelTooLow => write!(f, "level must be at least 1"),
            OptionsError::WidthOutOfRange(w) => write!(
                f,
                "grid width {w} outside {MIN_GRID_DIMENSION}..={MAX_GRID_DIMENSION}"
            ),
            OptionsError::HeightOutOfRange(h) => write!(
                f,
                "grid height {h} outside {MIN_GRID_DIMENSION}..={MAX_GRID_DIMENSION}"
            ),
            OptionsError::StartingHeightOutOfRange(p) => write!(
                f,
                "starting height {p} outside 0..={MAX_STARTING_HEIGHT}"
            ),
        }
    }
}

impl std::error::Error for OptionsError {}
