//! Error types for thread storage operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Malformed comment payload: {0}")]
    MalformedPayload(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Write to {document} rejected: {reason}")]
    WriteConflict { document: String, reason: String },

    #[error("Internal storage error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
