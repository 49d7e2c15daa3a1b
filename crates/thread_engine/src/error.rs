//! Error types for command handling

use thiserror::Error;
use thread_model::ModelError;
use thread_render::RenderError;
use thread_store::StoreError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// The command referenced a comment that is not in the thread
    pub fn is_unknown_comment(&self) -> bool {
        matches!(
            self,
            EngineError::Model(ModelError::UnknownComment(_))
                | EngineError::Render(RenderError::UnknownComment(_))
        )
    }

    /// The host document refused the write-back; the change was lost
    pub fn is_write_conflict(&self) -> bool {
        matches!(self, EngineError::Store(StoreError::WriteConflict { .. }))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
