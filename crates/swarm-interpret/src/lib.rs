//! swarm-interpret: turns per-peer chunk transfers into playback segments.
//!
//! - [`interpreter`] - The [`Interpreter`] and its per-peer grouping pass
//! - [`settings`] - Pause and duration limits

pub mod interpreter;
pub mod settings;

pub use interpreter::Interpreter;
pub use settings::{InterpreterSettings, MAX_PAUSE_WITHIN_SEGMENT};
