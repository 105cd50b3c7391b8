//! Error types for the record store.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for store operations.
///
/// `Io` and `Parse` are fatal when returned from [`RecordStore::open`]: the
/// store cannot establish a safe initial state and construction fails. All
/// other variants are recoverable — the operation that produced them left the
/// collection and the backing file unchanged.
///
/// [`RecordStore::open`]: crate::store::RecordStore::open
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed database file {path}: {detail}")]
    Parse { path: PathBuf, detail: String },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: {value:?}")]
    InvalidValue { field: &'static str, value: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
