//! Error types for rendering

use thiserror::Error;
use thread_model::CommentId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Unknown comment: {0}")]
    UnknownComment(CommentId),

    #[error("Rich-text transform failed: {0}")]
    Transform(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
