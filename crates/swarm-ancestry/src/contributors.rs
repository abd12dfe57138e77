//! Piece payload recording which peers delivered the bytes of a region.

use serde::Serialize;
use std::collections::BTreeSet;

use swarm_core::{Chunk, Segment};

use crate::piece::{Inherit, Piece};

/// Set of peer addresses whose chunks fed a piece.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Contributors {
    pub contributors: BTreeSet<String>,
}

impl Contributors {
    pub fn single(peeraddr: impl Into<String>) -> Self {
        Self {
            contributors: BTreeSet::from([peeraddr.into()]),
        }
    }
}

impl Inherit for Contributors {
    fn inherit_from(&mut self, sources: &[&Piece<Self>]) {
        for source in sources {
            self.contributors
                .extend(source.payload.contributors.iter().cloned());
        }
    }
}

impl From<&Chunk> for Piece<Contributors> {
    fn from(chunk: &Chunk) -> Self {
        Piece::with_payload(
            chunk.id,
            chunk.t,
            chunk.begin,
            chunk.end,
            Contributors::single(chunk.peeraddr.as_str()),
        )
    }
}

impl From<&Segment> for Piece<Contributors> {
    fn from(segment: &Segment) -> Self {
        Piece::with_payload(
            segment.id,
            segment.onset,
            segment.begin,
            segment.end,
            Contributors::single(segment.peeraddr.as_str()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::AncestryTracker;

    fn chunk(id: u64, begin: u64, end: u64, peer: &str) -> Chunk {
        Chunk::new(id, id as f64, begin, end, peer, 0)
    }

    #[test]
    fn extension_unions_contributors() {
        let mut tracker: AncestryTracker<Contributors> = AncestryTracker::new();
        tracker.add((&chunk(0, 0, 100, "10.0.0.1")).into()).unwrap();
        tracker.add((&chunk(1, 100, 200, "10.0.0.2")).into()).unwrap();

        let piece = tracker.get("1").unwrap();
        let peers: Vec<&str> = piece.payload.contributors.iter().map(String::as_str).collect();
        assert_eq!(peers, vec!["10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn fusion_unions_all_retired_pieces() {
        let mut tracker: AncestryTracker<Contributors> = AncestryTracker::new();
        tracker.add((&chunk(0, 0, 100, "a")).into()).unwrap();
        tracker.add((&chunk(1, 200, 300, "b")).into()).unwrap();
        tracker.add((&chunk(2, 100, 200, "c")).into()).unwrap();

        let fused = tracker.get("n1").unwrap();
        assert_eq!(fused.payload.contributors.len(), 3);
        assert!(fused.payload.contributors.contains("c"));
        // Retired pieces keep the contributors they had when fused.
        assert_eq!(fused.parents["0"].payload, Contributors::single("a"));
    }

    #[test]
    fn disjoint_pieces_keep_their_own_peer() {
        let mut tracker: AncestryTracker<Contributors> = AncestryTracker::new();
        tracker.add((&chunk(0, 0, 100, "a")).into()).unwrap();
        tracker.add((&chunk(1, 500, 600, "b")).into()).unwrap();
        assert_eq!(tracker.get("0").unwrap().payload, Contributors::single("a"));
        assert_eq!(tracker.get("1").unwrap().payload, Contributors::single("b"));
    }

    #[test]
    fn serializes_contributors_inline() {
        let piece: Piece<Contributors> = (&chunk(3, 0, 10, "10.0.0.9")).into();
        let json = serde_json::to_value(&piece).unwrap();
        assert_eq!(json["contributors"], serde_json::json!(["10.0.0.9"]));
    }
}
