//! Blocktris (workspace facade crate).
//!
//! Re-exports the member crates as `blocktris::{core, input, term, types}` and
//! holds the runner glue shared by the binary and the integration tests.

pub use blocktris_core as core;
pub use blocktris_input as input;
pub use blocktris_term as term;
pub use blocktris_types as types;

pub mod config;
pub mod session;
