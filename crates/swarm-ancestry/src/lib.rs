//! swarm-ancestry: consolidation of byte-range observations with provenance.
//!
//! # Modules
//!
//! - [`piece`] - Pieces, the [`Inherit`] payload hook and lineage queries
//! - [`tracker`] - The [`AncestryTracker`] that merges overlapping pieces
//! - [`contributors`] - A payload recording contributing peers
//! - [`timeline`] - Per-add snapshots of a tracker
//! - [`peers`] - One tracker per peer

pub mod contributors;
pub mod peers;
pub mod piece;
pub mod timeline;
pub mod tracker;

// Re-export commonly used items at the crate root.
pub use contributors::Contributors;
pub use peers::PeerContributions;
pub use piece::{Inherit, Piece};
pub use timeline::{Frame, Timeline};
pub use tracker::{AncestryTracker, Merge, DEFAULT_SYNTHETIC_PREFIX};
