//! Error types for dsconv

use thiserror::Error;

/// dsconv error types
#[derive(Debug, Error)]
pub enum DsconvError {
    /// Caller or configuration fault (mapping, output type, mode, count, destination).
    #[error("Configuration error: {0}")]
    Config(String),
    /// An input item cannot be viewed as a record.
    #[error("Malformed record at index {index}: {reason}")]
    MalformedRecord {
        /// Position of the offending item in the input sequence
        index: usize,
        /// What was found instead of a record
        reason: String,
    },
    /// A record lacks a field the requested operation depends on.
    #[error("Schema error: record {index} has no field '{field}'")]
    Schema {
        /// Position of the offending record
        index: usize,
        /// Name of the missing field
        field: String,
    },
    /// Input or output location has a storage kind we cannot handle.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    /// A format library rejected the input.
    #[error("Failed to decode {path}: {reason}")]
    Decode {
        /// Path being read
        path: String,
        /// Underlying failure description
        reason: String,
    },
    /// I/O operation failed while reading or writing data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DsconvError {
    /// Shorthand for a [`DsconvError::Config`] error.
    pub fn config(message: impl Into<String>) -> Self {
        DsconvError::Config(message.into())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, DsconvError>;
