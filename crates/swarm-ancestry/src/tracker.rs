//! Consolidates a stream of byte-range observations into non-overlapping
//! pieces while keeping the full merge provenance of each piece.

use std::collections::BTreeMap;

use swarm_core::{Error, PieceId, Result};

use crate::piece::{Inherit, Piece};

/// Prefix of the ids the tracker allocates for fused pieces.
pub const DEFAULT_SYNTHETIC_PREFIX: &str = "n";

/// How [`AncestryTracker::add`] placed a piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Merge {
    /// No live piece overlapped; the piece was inserted as is.
    Inserted(PieceId),
    /// Exactly one live piece overlapped and was extended under the new id.
    Extended {
        id: PieceId,
        /// Id of the piece that moved into `growth`.
        previous: PieceId,
    },
    /// Several live pieces overlapped and were fused under a synthetic id.
    Fused {
        id: PieceId,
        /// Ids of the pieces that moved into `parents`.
        parents: Vec<PieceId>,
    },
}

impl Merge {
    /// Id of the live piece that now covers the added range.
    pub fn id(&self) -> &PieceId {
        match self {
            Merge::Inserted(id) => id,
            Merge::Extended { id, .. } => id,
            Merge::Fused { id, .. } => id,
        }
    }
}

/// Tracks the current minimal set of non-overlapping pieces.
#[derive(Debug, Clone)]
pub struct AncestryTracker<P = ()> {
    pieces: BTreeMap<PieceId, Piece<P>>,
    counter: u64,
    prefix: String,
}

impl<P: Inherit> Default for AncestryTracker<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Inherit> AncestryTracker<P> {
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_SYNTHETIC_PREFIX)
    }

    /// Create a tracker whose fused pieces are named `<prefix><counter>`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            pieces: BTreeMap::new(),
            counter: 1,
            prefix: prefix.into(),
        }
    }

    /// Add an observation, merging it with every live piece it overlaps.
    ///
    /// Fails with [`Error::DuplicateId`] when the resulting piece would
    /// collide with a live piece that is not being replaced. The tracker is
    /// left untouched in that case.
    pub fn add(&mut self, new_piece: Piece<P>) -> Result<Merge> {
        let overlapping: Vec<PieceId> = self
            .pieces
            .values()
            .filter(|live| live.overlaps(&new_piece))
            .map(|live| live.id.clone())
            .collect();

        match overlapping.as_slice() {
            [] => {
                let id = new_piece.id.clone();
                self.insert(new_piece)?;
                tracing::trace!(%id, "inserted piece");
                Ok(Merge::Inserted(id))
            }
            [previous] => {
                let previous = previous.clone();
                self.extend(new_piece, previous)
            }
            _ => self.fuse(new_piece, overlapping),
        }
    }

    /// Live pieces keyed by id.
    pub fn pieces(&self) -> &BTreeMap<PieceId, Piece<P>> {
        &self.pieces
    }

    /// Live pieces in id order.
    pub fn last_pieces(&self) -> impl Iterator<Item = &Piece<P>> {
        self.pieces.values()
    }

    pub fn get(&self, id: &str) -> Option<&Piece<P>> {
        self.pieces.get(id)
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn into_pieces(self) -> BTreeMap<PieceId, Piece<P>> {
        self.pieces
    }

    fn insert(&mut self, piece: Piece<P>) -> Result<()> {
        if self.pieces.contains_key(&piece.id) {
            return Err(Error::duplicate_id(&piece.id));
        }
        self.pieces.insert(piece.id.clone(), piece);
        Ok(())
    }

    fn extend(&mut self, new_piece: Piece<P>, previous_id: PieceId) -> Result<Merge> {
        let id = new_piece.id.clone();
        if id != previous_id && self.pieces.contains_key(&id) {
            return Err(Error::duplicate_id(&id));
        }
        let previous = self.take(&previous_id)?;

        let mut replacement: Piece<P> = Piece::new(
            id.clone(),
            new_piece.t.max(previous.t),
            new_piece.begin.min(previous.begin),
            new_piece.end.max(previous.end),
        );
        replacement
            .payload
            .inherit_from(&[&new_piece, &previous]);

        // The successor starts from a copy of the previous state's provenance;
        // the previous state itself is kept whole as the newest growth entry.
        replacement.parents = previous.parents.clone();
        replacement.growth = previous.growth.clone();
        replacement.growth.push(previous);

        tracing::trace!(
            %id,
            previous = %previous_id,
            begin = replacement.begin,
            end = replacement.end,
            "extended piece"
        );
        self.pieces.insert(id.clone(), replacement);
        Ok(Merge::Extended {
            id,
            previous: previous_id,
        })
    }

    fn fuse(&mut self, new_piece: Piece<P>, parent_ids: Vec<PieceId>) -> Result<Merge> {
        let id = self.next_synthetic_id();
        if self.pieces.contains_key(&id) && !parent_ids.contains(&id) {
            return Err(Error::duplicate_id(&id));
        }
        self.counter += 1;

        let retired = parent_ids
            .iter()
            .map(|parent_id| self.take(parent_id))
            .collect::<Result<Vec<_>>>()?;

        let sources: Vec<&Piece<P>> = std::iter::once(&new_piece).chain(&retired).collect();
        let mut replacement: Piece<P> = Piece::new(
            id.clone(),
            sources.iter().map(|p| p.t).fold(f64::NEG_INFINITY, f64::max),
            sources.iter().map(|p| p.begin).min().unwrap_or(new_piece.begin),
            sources.iter().map(|p| p.end).max().unwrap_or(new_piece.end),
        );
        replacement.payload.inherit_from(&sources);

        replacement.parents = retired
            .into_iter()
            .map(|parent| (parent.id.clone(), parent))
            .collect();

        tracing::debug!(
            %id,
            parents = parent_ids.len(),
            begin = replacement.begin,
            end = replacement.end,
            "fused pieces"
        );
        self.pieces.insert(id.clone(), replacement);
        Ok(Merge::Fused {
            id,
            parents: parent_ids,
        })
    }

    fn take(&mut self, id: &PieceId) -> Result<Piece<P>> {
        self.pieces
            .remove(id)
            .ok_or_else(|| Error::Internal(format!("overlapping piece {id} vanished")))
    }

    fn next_synthetic_id(&self) -> PieceId {
        PieceId::new(format!("{}{}", self.prefix, self.counter))
    }
}
