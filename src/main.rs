//! Terminal runner (default binary).
//!
//! Reads [`RunnerConfig`] from the environment, resumes the last saved game if
//! one exists, then drives the controller from crossterm input and the wall
//! clock. Quitting mid-game writes a save for the next launch.

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};

use blocktris::config::RunnerConfig;
use blocktris::core::{EventKind, Game};
use blocktris::input::{handle_key_event, should_quit};
use blocktris::session::{apply_action, discard_saved, load_saved, store_saved};
use blocktris::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};

/// Upper bound on the time between two frames
const FRAME_MS: u64 = 16;

fn main() -> Result<()> {
    let config = RunnerConfig::from_env();
    config
        .options
        .validate()
        .context("invalid BLOCKTRIS_* game options")?;

    let mut game = Game::new(config.options, config.seed);
    if let Some(path) = &config.save_path {
        resume(&mut game, path)?;
    }

    let mut term = TerminalRenderer::new();
    term.enter()?;
    let result = run(&mut term, &mut game);
    // Always try to restore terminal state.
    let _ = term.exit();
    result?;

    if let (Some(path), Some(saved)) = (&config.save_path, game.save_game()) {
        store_saved(path, &saved)?;
        println!("[Blocktris] Game saved to {}", path.display());
    }
    Ok(())
}

/// Load and consume the save file, falling back to a new game if it is unusable.
fn resume(game: &mut Game, path: &Path) -> Result<()> {
    match load_saved(path) {
        Ok(Some(saved)) => match game.restore_game(&saved) {
            Ok(()) => println!("[Blocktris] Resumed game from {}", path.display()),
            Err(e) => eprintln!("[Blocktris] Saved game rejected ({}), starting a new game", e),
        },
        Ok(None) => {}
        Err(e) => eprintln!("[Blocktris] {:#}, starting a new game", e),
    }
    discard_saved(path)
}

fn run(term: &mut TerminalRenderer, game: &mut Game) -> Result<()> {
    let dirty = Rc::new(Cell::new(true));
    for kind in EventKind::ALL {
        let dirty = Rc::clone(&dirty);
        game.events_mut().add_callback(kind, move |_| dirty.set(true));
    }
    game.start_game();

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let frame = Duration::from_millis(FRAME_MS);
    let mut last = Instant::now();

    loop {
        if dirty.replace(false) {
            let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
            view.render_into(game, Viewport::new(w, h), &mut fb);
            term.draw(&fb)?;
        }

        if event::poll(frame)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        apply_action(game, action);
                        // Idle and ended games emit nothing on some actions.
                        dirty.set(true);
                    }
                }
                Event::Resize(..) => {
                    term.invalidate();
                    dirty.set(true);
                }
                _ => {}
            }
        }

        let elapsed_ms = last.elapsed().as_millis() as u32;
        if elapsed_ms > 0 {
            game.advance(elapsed_ms);
            last += Duration::from_millis(elapsed_ms as u64);
        }
    }
}
