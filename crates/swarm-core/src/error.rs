//! Unified error type for swarmscore.
//!
//! Both analysis components funnel their failures into [`Error`].
//! [`Error::kind`] names the category in structured log fields.

use std::fmt;

/// Unified error type covering all failure modes in swarmscore.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A piece with this id is already live in the ancestry tracker.
    #[error("piece with id {id} already added")]
    DuplicateId {
        /// The colliding piece id.
        id: String,
    },

    /// Input data failed validation (malformed chunk, file metadata or settings).
    #[error("Validation error: {0}")]
    Validation(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A JSON document could not be read or written.
    #[error("JSON error: {source}")]
    Json {
        /// The underlying serde_json error.
        #[from]
        source: serde_json::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Stable, machine-readable name of the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::DuplicateId { .. } => "duplicate_id",
            Error::Validation(_) => "validation",
            Error::Io { .. } => "io",
            Error::Json { .. } => "json",
            Error::Internal(_) => "internal",
        }
    }

    /// Convenience constructor for [`Error::DuplicateId`].
    pub fn duplicate_id(id: impl fmt::Display) -> Self {
        Error::DuplicateId { id: id.to_string() }
    }

    /// Convenience constructor for [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
