//! Session glue for front ends: applying player actions and persisting saves.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::{Game, GameStatus, SavedGame};
use crate::types::{Direction, GameAction};

/// Apply one player action. Returns true if the game changed.
pub fn apply_action(game: &mut Game, action: GameAction) -> bool {
    match action {
        GameAction::MoveLeft => game.move_piece(Direction::Left),
        GameAction::MoveRight => game.move_piece(Direction::Right),
        GameAction::SoftDrop => game.move_piece(Direction::Down),
        GameAction::Rotate => game.rotate(),
        GameAction::HardDrop => game.hard_drop(),
        GameAction::TogglePause => match game.status() {
            GameStatus::Running => game.pause_game(),
            GameStatus::Paused => game.unpause_game(),
            _ => false,
        },
        GameAction::Restart => {
            game.reset();
            game.start_game()
        }
    }
}

/// Read a saved game written by [`store_saved`]. A missing file is `Ok(None)`.
pub fn load_saved(path: &Path) -> Result<Option<SavedGame>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read save file {}", path.display()))?;
    let saved = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse save file {}", path.display()))?;
    Ok(Some(saved))
}

pub fn store_saved(path: &Path, saved: &SavedGame) -> Result<()> {
    let text = serde_json::to_string(saved).context("failed to encode save")?;
    fs::write(path, text)
        .with_context(|| format!("failed to write save file {}", path.display()))
}

/// Delete a consumed save file; a missing file is not an error.
pub fn discard_saved(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
            Err(e).with_context(|| format!("failed to remove save file {}", path.display()))
        }
        _ => Ok(()),
    }
}
