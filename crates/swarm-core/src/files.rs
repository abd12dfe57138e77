//! Per-file metadata used to turn byte counts into playback time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Size and nominal playback duration of one file in the torrent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    /// File size in bytes.
    pub length: u64,
    /// Playback duration of the whole file.
    pub duration: f64,
}

impl FileInfo {
    pub fn new(length: u64, duration: f64) -> Self {
        Self { length, duration }
    }

    pub fn validate(&self) -> Result<()> {
        if self.length == 0 {
            return Err(Error::validation("file length must be positive"));
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(Error::validation(format!(
                "file duration must be a non-negative number, got {}",
                self.duration
            )));
        }
        Ok(())
    }

    /// Playback time of `size` bytes assuming the file plays at a constant
    /// byte rate. `None` for an empty file.
    pub fn unadjusted_duration(&self, size: u64) -> Option<f64> {
        if self.length == 0 {
            return None;
        }
        Some(size as f64 / self.length as f64 * self.duration)
    }
}

/// File metadata keyed by file number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileTable(BTreeMap<u32, FileInfo>);

impl FileTable {
    /// Number files by their position in `files`.
    pub fn from_list(files: impl IntoIterator<Item = FileInfo>) -> Self {
        Self(
            files
                .into_iter()
                .enumerate()
                .map(|(filenum, info)| (filenum as u32, info))
                .collect(),
        )
    }

    pub fn get(&self, filenum: u32) -> Option<&FileInfo> {
        self.0.get(&filenum)
    }

    pub fn contains(&self, filenum: u32) -> bool {
        self.0.contains_key(&filenum)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &FileInfo)> {
        self.0.iter().map(|(filenum, info)| (*filenum, info))
    }

    /// Validate every entry, naming the first offending file number.
    pub fn validate(&self) -> Result<()> {
        for (filenum, info) in self.iter() {
            info.validate().map_err(|e| match e {
                Error::Validation(msg) => Error::validation(format!("file {filenum}: {msg}")),
                other => other,
            })?;
        }
        Ok(())
    }
}
