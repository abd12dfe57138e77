//! Byte-range pieces and their merge provenance.

use serde::Serialize;
use std::collections::BTreeMap;

use swarm_core::{Chunk, PieceId, Segment};

/// Hook that lets a piece payload recompute itself when pieces are merged.
///
/// The tracker builds every replacement piece with `P::default()` and then
/// calls [`Inherit::inherit_from`] with the incoming piece followed by every
/// live piece it retires.
pub trait Inherit: Default + Clone + Sized {
    fn inherit_from(&mut self, sources: &[&Piece<Self>]);
}

impl Inherit for () {
    fn inherit_from(&mut self, _sources: &[&Piece<()>]) {}
}

/// A half-open byte interval `[begin, end)` with ancestry metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Piece<P = ()> {
    pub id: PieceId,
    /// Time at which this piece became current (last extension or fusion).
    pub t: f64,
    pub begin: u64,
    pub end: u64,
    /// Pieces fused to produce this one, keyed by their ids.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub parents: BTreeMap<PieceId, Piece<P>>,
    /// Earlier states of this piece, oldest first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub growth: Vec<Piece<P>>,
    #[serde(flatten)]
    pub payload: P,
}

impl<P: Default> Piece<P> {
    pub fn new(id: impl Into<PieceId>, t: f64, begin: u64, end: u64) -> Self {
        Self::with_payload(id, t, begin, end, P::default())
    }
}

impl<P> Piece<P> {
    pub fn with_payload(id: impl Into<PieceId>, t: f64, begin: u64, end: u64, payload: P) -> Self {
        Self {
            id: id.into(),
            t,
            begin,
            end,
            parents: BTreeMap::new(),
            growth: Vec::new(),
            payload,
        }
    }

    pub fn size(&self) -> u64 {
        self.end.saturating_sub(self.begin)
    }

    /// Inclusive overlap test: pieces that merely touch count as overlapping,
    /// so adjacent observations merge.
    pub fn overlaps<Q>(&self, other: &Piece<Q>) -> bool {
        self.begin <= other.end && other.begin <= self.end
    }

    /// Every retired piece that contributed to this one, depth first:
    /// parents in id order (each followed by its own ancestors), then growth
    /// states oldest first.
    pub fn ancestors(&self) -> Vec<&Piece<P>> {
        let mut out = Vec::new();
        self.collect_ancestors(&mut out);
        out
    }

    fn collect_ancestors<'a>(&'a self, out: &mut Vec<&'a Piece<P>>) {
        for parent in self.parents.values() {
            out.push(parent);
            parent.collect_ancestors(out);
        }
        for state in &self.growth {
            out.push(state);
            state.collect_ancestors(out);
        }
    }

    /// This piece's id followed by every ancestor id, sorted and deduplicated.
    pub fn lineage_ids(&self) -> Vec<&PieceId> {
        let mut ids: Vec<&PieceId> = std::iter::once(&self.id)
            .chain(self.ancestors().into_iter().map(|p| &p.id))
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Number of fusions on the longest path to an unfused ancestor.
    pub fn generation(&self) -> usize {
        self.parents
            .values()
            .map(|p| p.generation() + 1)
            .max()
            .unwrap_or(0)
    }
}

impl From<&Chunk> for Piece {
    fn from(chunk: &Chunk) -> Self {
        Piece::new(chunk.id, chunk.t, chunk.begin, chunk.end)
    }
}

impl From<&Segment> for Piece {
    fn from(segment: &Segment) -> Self {
        Piece::new(segment.id, segment.onset, segment.begin, segment.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pieces_do_not_share_containers() {
        let mut a: Piece = Piece::new("a", 0.0, 0, 10);
        let b: Piece = Piece::new("b", 0.0, 20, 30);
        a.growth.push(Piece::new("old", 0.0, 0, 5));
        assert!(b.growth.is_empty());
        assert!(b.parents.is_empty());
    }

    #[test]
    fn touching_pieces_overlap() {
        let a: Piece = Piece::new("a", 0.0, 0, 10);
        let b: Piece = Piece::new("b", 0.0, 10, 20);
        let c: Piece = Piece::new("c", 0.0, 21, 30);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!b.overlaps(&c));
    }

    #[test]
    fn containment_overlaps() {
        let outer: Piece = Piece::new("outer", 0.0, 0, 100);
        let inner: Piece = Piece::new("inner", 0.0, 40, 60);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn ancestry_walk_and_generation() {
        let mut fused: Piece = Piece::new("n1", 2.0, 0, 30);
        let mut left: Piece = Piece::new("n0", 1.0, 0, 10);
        left.parents.insert("a".into(), Piece::new("a", 0.0, 0, 5));
        left.parents.insert("b".into(), Piece::new("b", 0.0, 5, 10));
        fused.parents.insert("n0".into(), left);
        fused.parents.insert("c".into(), Piece::new("c", 0.5, 10, 30));
        fused.growth.push(Piece::new("d", 0.1, 0, 2));

        let ids: Vec<&str> = fused.ancestors().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "n0", "a", "b", "d"]);
        assert_eq!(fused.generation(), 2);
        assert_eq!(fused.lineage_ids().len(), 6);
    }

    #[test]
    fn chunk_converts_to_piece() {
        let chunk = Chunk::new(5, 1.0, 100, 200, "10.0.0.1", 0);
        let piece: Piece = Piece::from(&chunk);
        assert_eq!(piece.id.as_str(), "5");
        assert_eq!((piece.begin, piece.end), (100, 200));
        assert_eq!(piece.t, 1.0);
    }

    #[test]
    fn unit_payload_serializes_without_extra_fields() {
        let piece: Piece = Piece::new("a", 0.0, 0, 10);
        let json = serde_json::to_value(&piece).unwrap();
        assert_eq!(json, serde_json::json!({"id": "a", "t": 0.0, "begin": 0, "end": 10}));
    }
}
