//! Error types for nsscache.

use thiserror::Error;

/// Error type for nsscache operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The sink rejected a write part way through serialization.
    ///
    /// `written` counts the bytes the sink accepted before failing.
    #[error("write failed after {written} bytes: {source}")]
    Write {
        written: u64,
        #[source]
        source: std::io::Error,
    },

    /// Index field selector is out of range for a stored entry
    #[error("invalid field index {index}: entry {position} has {field_count} fields")]
    InvalidFieldIndex {
        index: usize,
        field_count: usize,
        position: usize,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed source line
    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Bytes committed to the sink before a write failure, if any.
    pub fn bytes_written(&self) -> Option<u64> {
        match self {
            Error::Write { written, .. } => Some(*written),
            _ => None,
        }
    }
}

/// Result type alias for nsscache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for parsing a single entry line.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EntryParseError {
    /// Wrong number of `:`-separated fields
    #[error("expected {expected} fields, got {actual}")]
    FieldCount { expected: usize, actual: usize },

    /// Numeric field is not a canonical decimal
    #[error("invalid number in field {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// Name field is empty
    #[error("empty name")]
    EmptyName,
}
