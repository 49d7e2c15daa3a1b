//! Error types for thread model operations

use crate::CommentId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Unknown comment: {0}")]
    UnknownComment(CommentId),
}

pub type Result<T> = std::result::Result<T, ModelError>;
