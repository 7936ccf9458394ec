//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. Nothing here
//! touches the game; the runner decides what each action does.

pub mod map;

pub use blocktris_types as types;

pub use map::{handle_key_event, should_quit};
