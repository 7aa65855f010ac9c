use std::path::PathBuf;

/// Errors from storage backend operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The write would push the store past its byte quota.
    #[error("storage quota exceeded: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded { needed: usize, quota: usize },

    /// The backend is disabled or otherwise unreachable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// I/O error from a durable backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A durable backend's file could not be decoded.
    #[error("corrupt store file {path:?}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// Serialization failure while writing a durable backend.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
