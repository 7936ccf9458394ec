//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains all the gameplay rules of the falling-block game. It has
//! **zero dependencies** on rendering, input or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical piece sequences and fills
//! - **Testable**: The auto-drop timer is driven explicitly, no wall clock involved
//! - **Portable**: Any front end can drive it through the control and event surfaces
//!
//! # Module Structure
//!
//! - [`grid`]: sparse playfield with collision detection and line compaction
//! - [`pieces`]: tetromino catalogue and rotation-state generation
//! - [`rng`]: seeded random source and the never-empty upcoming-piece queue
//! - [`ghost`]: landing projection of the active piece
//! - [`events`]: typed publish/subscribe dispatcher
//! - [`timer`]: auto-drop timer driven by the caller
//! - [`options`]: game options and their validation
//! - [`scoring`]: points for line clears
//! - [`game`]: the controller state machine tying everything together
//! - [`save`]: flat, versioned save/restore encoding
//!
//! # Example
//!
//! ```
//! use blocktris_core::{Game, GameOptions, GameStatus};
//! use blocktris_types::Direction;
//!
//! let options = GameOptions::default();
//! options.validate().unwrap();
//!
//! let mut game = Game::new(options, 12345);
//! game.start_game();
//! assert_eq!(game.status(), GameStatus::Running);
//!
//! game.move_piece(Direction::Left);
//! game.rotate();
//! game.hard_drop();
//! assert!(game.grid().cell_count() >= 4);
//! ```
//!
//! # Timing
//!
//! The controller never reads a clock. The front end calls
//! [`Game::advance`](game::Game::advance) with elapsed milliseconds, and each full
//! auto-drop interval turns into one [`Game::tick`](game::Game::tick), which moves
//! the active piece down one row.

pub mod events;
pub mod game;
pub mod ghost;
pub mod grid;
pub mod options;
pub mod pieces;
pub mod rng;
pub mod save;
pub mod scoring;
pub mod timer;

pub use blocktris_types as types;

// Re-export commonly used types for convenience
pub use events::{CallbackId, Event, EventDispatcher, EventKind};
pub use game::{Game, GameStatus};
pub use ghost::{find_closest_larger, project_ghost};
pub use grid::{Grid, GridSnapshot};
pub use options::{GameOptions, OptionsError};
pub use pieces::{PieceCoords, Tetromino};
pub use rng::{PieceQueue, SimpleRng};
pub use save::{RestoreError, SaveState, SavedGame, SAVE_FORMAT_VERSION};
pub use scoring::calculate_line_score;
pub use timer::DropTimer;
