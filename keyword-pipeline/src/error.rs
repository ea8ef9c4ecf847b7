//! Typed error for the keyword pipeline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Chat or embedding call failed (transport, status, decode).
    #[error("LLM error: {0}")]
    Llm(#[from] ai_llm_service::AiLlmError),

    /// Query history store failed or rejected the input.
    #[error("history error: {0}")]
    History(#[from] query_history::HistoryError),

    /// Embedding vector did not have the configured size.
    #[error("embedding dimension mismatch: got {got}, want {want}")]
    DimensionMismatch { got: usize, want: usize },

    /// Batch input had the wrong shape.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Batch input file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Batch input file was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// True when the caller supplied no user id.
    pub fn is_missing_user_id(&self) -> bool {
        matches!(
            self,
            Self::History(query_history::HistoryError::MissingUserId)
        )
    }
}
