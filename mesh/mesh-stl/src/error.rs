//! Error types for STL decoding.

use std::num::ParseFloatError;

use mesh_soup::SoupError;
use thiserror::Error;

/// Result type for STL operations.
pub type StlResult<T> = Result<T, StlError>;

/// Coarse classification of [`StlError`] for callers deciding what to do
/// with a failed parse (retry with another source, report, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StlErrorKind {
    /// The input could not be opened.
    SourceNotFound,
    /// A numeric field in an ASCII file did not parse.
    MalformedNumeric,
    /// Truncated or inconsistent data, or an I/O failure while reading.
    Structural,
}

/// Errors that can occur while decoding an STL stream.
///
/// Every variant aborts the parse; no partial mesh is produced.
#[derive(Debug, Error)]
pub enum StlError {
    /// Source could not be located.
    #[error("STL source not found: {source_name}")]
    SourceNotFound {
        /// File path or asset identifier that was requested.
        source_name: String,
    },

    /// A field expected to be a float failed to parse.
    #[error("line {line}: malformed number {field:?}")]
    MalformedNumeric {
        /// 1-based line number.
        line: usize,
        /// The offending field text.
        field: String,
        /// Underlying parse failure.
        #[source]
        source: ParseFloatError,
    },

    /// A line had fewer than three numeric fields after its keyword.
    #[error("line {line}: expected three numeric fields")]
    MissingField {
        /// 1-based line number.
        line: usize,
    },

    /// The binary header (80 bytes + facet count) is incomplete.
    #[error("invalid STL header: expected {expected} bytes, got {got}")]
    InvalidHeader {
        /// Required header size.
        expected: usize,
        /// Bytes actually available.
        got: usize,
    },

    /// Stream ended in the middle of a binary facet record.
    #[error("unexpected end of file at position {position}")]
    UnexpectedEof {
        /// Byte offset where the stream ended.
        position: u64,
    },

    /// Declared facet count disagrees with the records present.
    #[error("invalid facet count: header declares {expected}, file holds {got}")]
    InvalidFacetCount {
        /// Count declared in the header.
        expected: u32,
        /// Complete records actually read.
        got: u64,
    },

    /// Decoded arrays do not form a valid triangle soup.
    #[error("inconsistent geometry: {0}")]
    Geometry(#[from] SoupError),

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StlError {
    /// Classify the error.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_stl::{StlError, StlErrorKind};
    ///
    /// let err = StlError::UnexpectedEof { position: 90 };
    /// assert_eq!(err.kind(), StlErrorKind::Structural);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> StlErrorKind {
        match self {
            Self::SourceNotFound { .. } => StlErrorKind::SourceNotFound,
            Self::MalformedNumeric { .. } | Self::MissingField { .. } => {
                StlErrorKind::MalformedNumeric
            }
            Self::InvalidHeader { .. }
            | Self::UnexpectedEof { .. }
            | Self::InvalidFacetCount { .. }
            | Self::Geometry(_)
            | Self::Io(_) => StlErrorKind::Structural,
        }
    }

    /// Map an open failure to [`StlError::SourceNotFound`] when the cause is
    /// a missing file, [`StlError::Io`] otherwise.
    pub(crate) fn from_open(err: std::io::Error, source_name: impl Into<String>) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::SourceNotFound {
                source_name: source_name.into(),
            }
        } else {
            Self::Io(err)
        }
    }
}
