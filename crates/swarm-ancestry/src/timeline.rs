//! Pre-rendered history of a tracker: one snapshot per added piece.

use serde::Serialize;
use std::collections::BTreeMap;

use swarm_core::{PieceId, Result};

use crate::piece::{Inherit, Piece};
use crate::tracker::{AncestryTracker, Merge};

/// Live pieces right after one `add`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame<P = ()> {
    /// Timestamp of the piece that produced this frame.
    pub t: f64,
    pub pieces: BTreeMap<PieceId, Piece<P>>,
    /// Number of pieces added so far, including this one.
    pub num_pieces: usize,
}

/// Records a [`Frame`] after every successful add.
#[derive(Debug, Clone)]
pub struct Timeline<P = ()> {
    tracker: AncestryTracker<P>,
    frames: Vec<Frame<P>>,
}

impl<P: Inherit> Default for Timeline<P> {
    fn default() -> Self {
        Self::new(AncestryTracker::new())
    }
}

impl<P: Inherit> Timeline<P> {
    pub fn new(tracker: AncestryTracker<P>) -> Self {
        Self {
            tracker,
            frames: Vec::new(),
        }
    }

    /// Add a piece to the underlying tracker and snapshot the result.
    /// A rejected piece records no frame.
    pub fn add(&mut self, piece: Piece<P>) -> Result<Merge> {
        let t = piece.t;
        let merge = self.tracker.add(piece)?;
        self.frames.push(Frame {
            t,
            pieces: self.tracker.pieces().clone(),
            num_pieces: self.frames.len() + 1,
        });
        Ok(merge)
    }

    pub fn tracker(&self) -> &AncestryTracker<P> {
        &self.tracker
    }

    pub fn frames(&self) -> &[Frame<P>] {
        &self.frames
    }

    /// The last frame recorded at or before `t`. Frames are expected in
    /// non-decreasing time order, as pieces are.
    pub fn frame_at(&self, t: f64) -> Option<&Frame<P>> {
        let idx = self.frames.partition_point(|frame| frame.t <= t);
        idx.checked_sub(1).map(|i| &self.frames[i])
    }
}
