//! Error types for ebwt-inspect
//!
//! Three families of failure are kept apart in the type system:
//! usage errors (bad invocation, reported with usage text), integrity
//! errors (collaborators disagree with each other, unrecoverable) and
//! index errors (an index file could not be read or decoded).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ebwt-inspect operations
#[derive(Debug, Error)]
pub enum InspectError {
    /// Bad or missing invocation arguments
    #[error("Usage error: {0}")]
    Usage(String),

    /// Structural inconsistency between index components
    #[error("Integrity error: {0}")]
    Integrity(#[from] IntegrityError),

    /// Failure reported by an index adapter
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    /// I/O errors while writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl InspectError {
    /// True for errors that should be answered with usage text
    pub fn is_usage(&self) -> bool {
        matches!(self, InspectError::Usage(_))
    }
}

/// Defensive checks that signal a corrupted index or a bug
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntegrityError {
    /// Packed store and name list disagree on the number of references
    #[error("Packed reference store has {store} references but the index names {names}")]
    ReferenceCountMismatch { store: usize, names: usize },

    /// Decoded symbol code outside the ACGTN table
    #[error("Symbol code {code} is outside the alphabet range 0..=4")]
    InvalidSymbolCode { code: u8 },

    /// Reference index not covered by the name list
    #[error("Reference index {index} out of range ({count} references)")]
    ReferenceOutOfRange { index: usize, count: usize },

    /// Reconstructed sequence grew past its declared length
    #[error("Record '{name}' reached {actual} bases, declared length is {declared}")]
    RecordOverflow {
        name: String,
        declared: u64,
        actual: u64,
    },
}

/// Errors raised while loading or querying an index
#[derive(Debug, Error)]
pub enum IndexError {
    /// Index file not found under any search location
    #[error("Index file not found: {0}")]
    FileNotFound(PathBuf),

    /// File ended before a required section
    #[error("{path}: truncated, needed {needed} bytes but file has {actual}")]
    Truncated {
        path: PathBuf,
        needed: u64,
        actual: u64,
    },

    /// Header fields are inconsistent or unsupported
    #[error("{path}: invalid header: {message}")]
    InvalidHeader { path: PathBuf, message: String },

    /// Reference record table does not start a reference
    #[error("{0}: first reference record is not marked as a sequence start")]
    MissingFirstRecord(PathBuf),

    /// Stretch request outside a reference
    #[error("Stretch {start}..{end} is outside reference {reference} (length {length})")]
    StretchOutOfRange {
        reference: usize,
        start: u64,
        end: u64,
        length: u64,
    },

    /// Store returned fewer codes than requested
    #[error("Stretch of reference {reference} returned {actual} codes, expected {expected}")]
    ShortStretch {
        reference: usize,
        expected: usize,
        actual: usize,
    },

    /// The index cannot serve the requested operation
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// I/O error during loading
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ebwt-inspect operations
pub type Result<T> = std::result::Result<T, InspectError>;

/// Result type alias for index adapter operations
pub type IndexResult<T> = std::result::Result<T, IndexError>;
