//! Glue between a loaded session, the configuration and the analysis crates.
//!
//! Every function here is a pure transformation of its inputs; the CLI only
//! reads files and prints what these return.

use serde::Serialize;

use swarm_ancestry::{AncestryTracker, Inherit, PeerContributions, Piece};
use swarm_core::{Error, Result, Segment, Session};
use swarm_interpret::Interpreter;

use crate::config::Config;

/// Narrow the session to one file before ancestry tracking.
///
/// Byte offsets are only comparable within a file. With `filenum` set, chunks
/// of other files are dropped; without it, a session spanning several files is
/// rejected.
pub fn select_file(session: &mut Session, filenum: Option<u32>) -> Result<()> {
    match filenum {
        Some(filenum) => {
            let dropped = session.retain_file(filenum);
            tracing::debug!(filenum, dropped, "selected file");
            Ok(())
        }
        None => {
            let filenums = session.filenums();
            if filenums.len() > 1 {
                return Err(Error::validation(format!(
                    "chunk log spans files {filenums:?}; select a single file"
                )));
            }
            Ok(())
        }
    }
}

/// Group the session's chunks into segments, stamping each chunk.
pub fn interpret_session(session: &mut Session, config: &Config) -> Result<Vec<Segment>> {
    Interpreter::new(config.interpret).interpret(&mut session.chunks, session.files.as_ref())
}

/// Feed pieces, in order, into a fresh tracker configured from `config`.
pub fn track_ancestry<P: Inherit>(
    pieces: impl IntoIterator<Item = Piece<P>>,
    config: &Config,
) -> Result<AncestryTracker<P>> {
    let mut tracker = AncestryTracker::with_prefix(config.ancestry.synthetic_id_prefix.as_str());
    for piece in pieces {
        tracker
            .add(piece)
            .inspect_err(|e| tracing::error!(kind = e.kind(), "ancestry tracking stopped: {e}"))?;
    }
    tracing::info!(live = tracker.len(), "ancestry tracking finished");
    Ok(tracker)
}

/// Bytes delivered by one peer, consolidated into regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeerCoverage {
    pub peeraddr: String,
    pub regions: usize,
    pub bytes: u64,
}

/// Per-peer coverage, in the order peers first appear in the session.
pub fn peer_coverage(session: &Session) -> Result<Vec<PeerCoverage>> {
    let contributions = PeerContributions::from_chunks(&session.chunks)?;
    Ok(session
        .peers()
        .into_iter()
        .map(|peer| PeerCoverage {
            peeraddr: peer.to_string(),
            regions: contributions.region_count(peer),
            bytes: contributions.coverage(peer),
        })
        .collect())
}
