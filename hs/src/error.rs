//! HistoryStore error types

use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error in {key} line {line}: {source}")]
    Corrupt {
        key: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    #[error("Capacity must be at least 1")]
    ZeroCapacity,
}

pub type StoreResult<T> = Result<T, StoreError>;
