//! Store error types.

use thiserror::Error;

/// Errors that can occur when loading or saving state documents.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read or write a state file.
    #[error("failed to access state file: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to parse or serialize state JSON.
    #[error("failed to parse state JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The on-disk document uses a storage version this build cannot read.
    #[error("unsupported storage version: {0}")]
    UnsupportedVersion(u32),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
