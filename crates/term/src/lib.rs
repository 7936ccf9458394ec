//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer: [`GameView`] draws a
//! [`core::Game`] into a [`FrameBuffer`] without any I/O, and
//! [`TerminalRenderer`] flushes frames to the terminal with `crossterm`.
//! Cells are drawn 2 columns wide to keep the playfield roughly square.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blocktris_core as core;
pub use blocktris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport, MAX_CELL_W};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
