//! Typed ID wrappers for transfer events, segments and ancestry pieces.
//!
//! Chunk and segment ids are numeric (as assigned by the log reader), piece
//! ids are strings because the tracker mixes caller-supplied ids with its own
//! synthetic ones.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Generate a newtype ID wrapper over `u64`.
///
/// The macro produces a struct with:
/// - `new(value)` and `get()` accessors
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`,
///   `Serialize`, `Deserialize`
/// - `Display` and `FromStr` delegating to the inner integer
/// - `From<u64>` and `Into<u64>` conversions
macro_rules! numeric_id {
    ($($(#[doc = $doc:expr])* $name:ident),+ $(,)?) => {
        $(
            $(#[doc = $doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(u64);

            impl $name {
                /// Wrap a raw id value.
                #[must_use]
                pub const fn new(value: u64) -> Self {
                    Self(value)
                }

                /// Return the raw id value.
                #[must_use]
                pub const fn get(&self) -> u64 {
                    self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl FromStr for $name {
                type Err = std::num::ParseIntError;

                fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                    s.parse().map(Self)
                }
            }

            impl From<u64> for $name {
                fn from(value: u64) -> Self {
                    Self(value)
                }
            }

            impl From<$name> for u64 {
                fn from(id: $name) -> Self {
                    id.0
                }
            }
        )+
    };
}

numeric_id! {
    /// Identifier of a single chunk transfer event.
    ChunkId,
    /// Identifier of an interpreted segment (the id of its first chunk).
    SegmentId,
}

impl From<ChunkId> for SegmentId {
    fn from(id: ChunkId) -> Self {
        Self(id.0)
    }
}

/// Identifier of a piece in the ancestry tracker.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(String);

impl PieceId {
    /// Create a piece id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PieceId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for PieceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<ChunkId> for PieceId {
    fn from(id: ChunkId) -> Self {
        Self(id.to_string())
    }
}

impl From<SegmentId> for PieceId {
    fn from(id: SegmentId) -> Self {
        Self(id.to_string())
    }
}

impl std::borrow::Borrow<str> for PieceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_id_from_chunk_id() {
        let chunk = ChunkId::new(42);
        let segment = SegmentId::from(chunk);
        assert_eq!(segment.get(), 42);
    }

    #[test]
    fn display_and_from_str() {
        let id = ChunkId::new(7);
        let parsed: ChunkId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("seven".parse::<SegmentId>().is_err());
    }

    #[test]
    fn serde_is_transparent() {
        let json = serde_json::to_string(&ChunkId::new(3)).unwrap();
        assert_eq!(json, "3");
        let piece: PieceId = serde_json::from_str("\"n1\"").unwrap();
        assert_eq!(piece.as_str(), "n1");
    }

    #[test]
    fn piece_id_from_numeric_ids() {
        assert_eq!(PieceId::from(ChunkId::new(12)).as_str(), "12");
        assert_eq!(PieceId::from(SegmentId::new(5)), PieceId::from("5"));
    }

    #[test]
    fn piece_id_map_lookup_by_str() {
        use std::collections::BTreeMap;
        let mut map = BTreeMap::new();
        map.insert(PieceId::from("a"), 1);
        assert_eq!(map.get("a"), Some(&1));
    }
}
