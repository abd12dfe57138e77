//! Per-peer consolidation: which byte regions each peer has delivered.
//!
//! Byte offsets are relative to one file, so every (peer, file) pair gets
//! its own tracker.

use std::collections::BTreeMap;

use swarm_core::{Chunk, PieceId, Result};

use crate::piece::Piece;
use crate::tracker::{AncestryTracker, Merge};

/// One [`AncestryTracker`] per peer address and file number.
#[derive(Debug, Clone, Default)]
pub struct PeerContributions {
    trackers: BTreeMap<(String, u32), AncestryTracker>,
}

impl PeerContributions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a chunk stream in input order.
    pub fn from_chunks<'a>(chunks: impl IntoIterator<Item = &'a Chunk>) -> Result<Self> {
        let mut contributions = Self::new();
        for chunk in chunks {
            contributions.add_chunk(chunk)?;
        }
        Ok(contributions)
    }

    pub fn add_chunk(&mut self, chunk: &Chunk) -> Result<Merge> {
        self.trackers
            .entry((chunk.peeraddr.clone(), chunk.filenum))
            .or_default()
            .add(Piece::from(chunk))
    }

    /// Peer addresses in sorted order.
    pub fn peers(&self) -> impl Iterator<Item = &str> {
        let mut peers: Vec<&str> = self.trackers.keys().map(|(peer, _)| peer.as_str()).collect();
        peers.dedup();
        peers.into_iter()
    }

    /// Consolidated regions `peeraddr` delivered within `filenum`.
    pub fn regions(&self, peeraddr: &str, filenum: u32) -> Option<&BTreeMap<PieceId, Piece>> {
        self.trackers
            .get(&(peeraddr.to_string(), filenum))
            .map(AncestryTracker::pieces)
    }

    /// Number of regions `peeraddr` delivered across all files.
    pub fn region_count(&self, peeraddr: &str) -> usize {
        self.trackers_of(peeraddr).map(AncestryTracker::len).sum()
    }

    /// Bytes covered by `peeraddr`'s regions across all files; zero for an
    /// unknown peer.
    pub fn coverage(&self, peeraddr: &str) -> u64 {
        self.trackers_of(peeraddr)
            .flat_map(AncestryTracker::last_pieces)
            .map(Piece::size)
            .sum()
    }

    fn trackers_of<'a>(&'a self, peeraddr: &'a str) -> impl Iterator<Item = &'a AncestryTracker> {
        self.trackers
            .iter()
            .filter(move |((peer, _), _)| peer == peeraddr)
            .map(|(_, tracker)| tracker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peers_are_tracked_separately() {
        let chunks = vec![
            Chunk::new(0, 0.0, 0, 1000, "10.0.0.1", 0),
            Chunk::new(1, 0.1, 1000, 2000, "10.0.0.2", 0),
            Chunk::new(2, 0.2, 1000, 2000, "10.0.0.1", 0),
            Chunk::new(3, 0.3, 5000, 5500, "10.0.0.2", 0),
        ];
        let contributions = PeerContributions::from_chunks(&chunks).unwrap();

        let peers: Vec<&str> = contributions.peers().collect();
        assert_eq!(peers, vec!["10.0.0.1", "10.0.0.2"]);
        assert_eq!(contributions.regions("10.0.0.1", 0).unwrap().len(), 1);
        assert_eq!(contributions.regions("10.0.0.2", 0).unwrap().len(), 2);
        assert_eq!(contributions.coverage("10.0.0.1"), 2000);
        assert_eq!(contributions.coverage("10.0.0.2"), 1500);
        assert_eq!(contributions.coverage("10.0.0.3"), 0);
    }

    #[test]
    fn same_offsets_in_different_files_stay_apart() {
        let chunks = vec![
            Chunk::new(0, 0.0, 0, 1000, "10.0.0.1", 0),
            Chunk::new(1, 0.1, 500, 800, "10.0.0.1", 1),
        ];
        let contributions = PeerContributions::from_chunks(&chunks).unwrap();

        let peers: Vec<&str> = contributions.peers().collect();
        assert_eq!(peers, vec!["10.0.0.1"]);
        assert_eq!(contributions.region_count("10.0.0.1"), 2);
        assert_eq!(contributions.coverage("10.0.0.1"), 1300);
        let second: Vec<&str> = contributions
            .regions("10.0.0.1", 1)
            .unwrap()
            .keys()
            .map(PieceId::as_str)
            .collect();
        assert_eq!(second, vec!["1"]);
    }
}
