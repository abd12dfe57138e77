//! swarm-core: shared errors, identifiers and transfer-event types.
//!
//! This crate is the foundational dependency for the other swarm-* crates.
//! It defines the chunk and segment records that flow between the log reader,
//! the segment interpreter and the ancestry tracker.

pub mod chunk;
pub mod error;
pub mod files;
pub mod ids;
pub mod log;
pub mod segment;

// Re-export the most commonly used items at the crate root.
pub use chunk::{Chunk, ChunkRecord};
pub use error::{Error, Result};
pub use files::{FileInfo, FileTable};
pub use ids::*;
pub use log::{ChunkLog, Session};
pub use segment::Segment;
