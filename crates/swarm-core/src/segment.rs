//! Continuous playback segments produced by grouping chunks.

use serde::{Deserialize, Serialize};

use crate::chunk::Chunk;
use crate::ids::SegmentId;

/// A run of byte-contiguous chunks from one peer on one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    /// Arrival time of the first chunk.
    pub onset: f64,
    pub begin: u64,
    pub end: u64,
    /// Estimated playback duration. Absent when no file metadata was available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    pub peeraddr: String,
    pub filenum: u32,
}

impl Segment {
    /// Seed a segment from its first chunk.
    pub fn seeded_from(chunk: &Chunk, duration: Option<f64>) -> Self {
        Self {
            id: chunk.id.into(),
            onset: chunk.t,
            begin: chunk.begin,
            end: chunk.end,
            duration,
            peeraddr: chunk.peeraddr.clone(),
            filenum: chunk.filenum,
        }
    }

    pub fn size(&self) -> u64 {
        self.end.saturating_sub(self.begin)
    }

    /// Time at which playback of this segment is expected to finish.
    /// A segment without a duration estimate ends at its onset.
    pub fn playback_end(&self) -> f64 {
        self.onset + self.duration.unwrap_or(0.0)
    }
}
