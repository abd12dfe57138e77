//! Chunk logs: the JSON document an external log reader hands to swarmscore.
//!
//! A [`ChunkLog`] is the raw, loosely-typed form; [`Session`] is the validated
//! form both analysis components consume.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::chunk::{Chunk, ChunkRecord};
use crate::error::{Error, Result};
use crate::files::{FileInfo, FileTable};

/// Raw log document: `{ "files": [...], "chunks": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkLog {
    /// File metadata indexed by file number. Optional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileInfo>>,
    #[serde(default)]
    pub chunks: Vec<ChunkRecord>,
}

impl ChunkLog {
    pub fn from_json(json_str: &str) -> Result<Self> {
        Ok(serde_json::from_str(json_str)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Validate every record. The first malformed chunk fails the whole log.
    pub fn into_session(self) -> Result<Session> {
        let chunks = self
            .chunks
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                Chunk::try_from(record).map_err(|e| match e {
                    Error::Validation(msg) => Error::validation(format!("chunk #{index}: {msg}")),
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let files = self.files.map(FileTable::from_list);
        if let Some(files) = &files {
            files.validate()?;
        }

        tracing::debug!(
            chunks = chunks.len(),
            files = files.as_ref().map(FileTable::len),
            "loaded chunk log"
        );
        Ok(Session { chunks, files })
    }
}

/// A validated, chronologically ordered chunk stream with optional file metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub chunks: Vec<Chunk>,
    pub files: Option<FileTable>,
}

impl Session {
    pub fn new(chunks: Vec<Chunk>, files: Option<FileTable>) -> Self {
        Self { chunks, files }
    }

    /// Highest byte offset delivered by any chunk.
    pub fn total_file_size(&self) -> u64 {
        self.chunks.iter().map(|c| c.end).max().unwrap_or(0)
    }

    /// Arrival time of the latest chunk.
    pub fn last_chunk_time(&self) -> Option<f64> {
        self.chunks.iter().map(|c| c.t).reduce(f64::max)
    }

    /// Distinct peer addresses in the order they first appear.
    pub fn peers(&self) -> Vec<&str> {
        let mut peers: Vec<&str> = Vec::new();
        for chunk in &self.chunks {
            if !peers.contains(&chunk.peeraddr.as_str()) {
                peers.push(&chunk.peeraddr);
            }
        }
        peers
    }

    /// Distinct file numbers referenced by chunks, ascending.
    pub fn filenums(&self) -> Vec<u32> {
        let mut filenums: Vec<u32> = self.chunks.iter().map(|c| c.filenum).collect();
        filenums.sort_unstable();
        filenums.dedup();
        filenums
    }

    /// Keep only the chunks of `filenum`. Returns the number of chunks removed.
    pub fn retain_file(&mut self, filenum: u32) -> usize {
        let before = self.chunks.len();
        self.chunks.retain(|c| c.filenum == filenum);
        before - self.chunks.len()
    }

    /// Drop chunks whose file has no metadata. Without a file table nothing
    /// is dropped. Returns the number of chunks removed.
    pub fn retain_described_files(&mut self) -> usize {
        let Some(files) = &self.files else {
            return 0;
        };
        let before = self.chunks.len();
        self.chunks.retain(|c| files.contains(c.filenum));
        let dropped = before - self.chunks.len();
        if dropped > 0 {
            tracing::info!(dropped, "ignored chunks for files without metadata");
        }
        dropped
    }
}
