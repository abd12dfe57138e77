//! Raw transfer events: one peer delivering one byte range of one file.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ids::{ChunkId, SegmentId};

/// A validated chunk transfer event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    /// Time at which the chunk arrived.
    pub t: f64,
    /// First byte offset (inclusive).
    pub begin: u64,
    /// Last byte offset (exclusive).
    pub end: u64,
    /// Address of the peer that delivered the chunk.
    pub peeraddr: String,
    /// Index of the file within the torrent.
    pub filenum: u32,
    /// Segment this chunk was folded into, stamped by the interpreter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<SegmentId>,
}

impl Chunk {
    /// Create a chunk that has not yet been assigned to a segment.
    pub fn new(
        id: impl Into<ChunkId>,
        t: f64,
        begin: u64,
        end: u64,
        peeraddr: impl Into<String>,
        filenum: u32,
    ) -> Self {
        Self {
            id: id.into(),
            t,
            begin,
            end,
            peeraddr: peeraddr.into(),
            filenum,
            segment_id: None,
        }
    }

    /// Number of bytes covered.
    pub fn size(&self) -> u64 {
        self.end.saturating_sub(self.begin)
    }

    /// Check the values a well-formed chunk must satisfy.
    pub fn validate(&self) -> Result<()> {
        if !self.t.is_finite() {
            return Err(Error::validation(format!(
                "chunk {} has non-finite timestamp {}",
                self.id, self.t
            )));
        }
        if self.end < self.begin {
            return Err(Error::validation(format!(
                "chunk {} ends before it begins ({}..{})",
                self.id, self.begin, self.end
            )));
        }
        Ok(())
    }
}

/// A chunk as read from a log, before required fields are checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    #[serde(default)]
    pub id: Option<ChunkId>,
    #[serde(default)]
    pub t: Option<f64>,
    #[serde(default)]
    pub begin: Option<u64>,
    #[serde(default)]
    pub end: Option<u64>,
    #[serde(default)]
    pub peeraddr: Option<String>,
    #[serde(default)]
    pub filenum: Option<u32>,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| Error::validation(format!("chunk record missing field `{field}`")))
}

impl TryFrom<ChunkRecord> for Chunk {
    type Error = Error;

    fn try_from(record: ChunkRecord) -> Result<Self> {
        let chunk = Chunk {
            id: required(record.id, "id")?,
            t: required(record.t, "t")?,
            begin: required(record.begin, "begin")?,
            end: required(record.end, "end")?,
            peeraddr: required(record.peeraddr, "peeraddr")?,
            filenum: required(record.filenum, "filenum")?,
            segment_id: None,
        };
        chunk.validate()?;
        Ok(chunk)
    }
}

impl From<&Chunk> for ChunkRecord {
    fn from(chunk: &Chunk) -> Self {
        Self {
            id: Some(chunk.id),
            t: Some(chunk.t),
            begin: Some(chunk.begin),
            end: Some(chunk.end),
            peeraddr: Some(chunk.peeraddr.clone()),
            filenum: Some(chunk.filenum),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ChunkRecord {
        ChunkRecord::from(&Chunk::new(1, 0.5, 0, 1000, "10.0.0.1", 0))
    }

    #[test]
    fn complete_record_converts() {
        let chunk = Chunk::try_from(record()).unwrap();
        assert_eq!(chunk.id, ChunkId::new(1));
        assert_eq!(chunk.size(), 1000);
        assert!(chunk.segment_id.is_none());
    }

    #[test]
    fn missing_field_is_named() {
        let mut rec = record();
        rec.peeraddr = None;
        let err = Chunk::try_from(rec).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("`peeraddr`"));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut rec = record();
        rec.begin = Some(2000);
        assert!(Chunk::try_from(rec).is_err());
    }

    #[test]
    fn non_finite_time_is_rejected() {
        let chunk = Chunk::new(1, f64::NAN, 0, 10, "10.0.0.1", 0);
        assert!(chunk.validate().is_err());
    }

    #[test]
    fn record_deserializes_with_gaps() {
        let rec: ChunkRecord = serde_json::from_str(r#"{"t": 1.5, "begin": 0}"#).unwrap();
        assert_eq!(rec.t, Some(1.5));
        assert!(rec.end.is_none());
        assert!(Chunk::try_from(rec).is_err());
    }

    #[test]
    fn segment_id_is_omitted_until_stamped() {
        let mut chunk = Chunk::new(4, 0.0, 0, 10, "10.0.0.1", 0);
        let json = serde_json::to_value(&chunk).unwrap();
        assert!(json.get("segment_id").is_none());

        chunk.segment_id = Some(SegmentId::new(2));
        let json = serde_json::to_value(&chunk).unwrap();
        assert_eq!(json["segment_id"], 2);
    }
}
