//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for query history operations.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The caller did not provide a user identifier (absent or blank).
    #[error("user_id is missing")]
    MissingUserId,

    /// A legacy `query_<n>` / `indices_<n>` field carried a suffix that is not
    /// a positive integer.
    #[error("invalid history field suffix: {field}")]
    InvalidSuffix { field: String },

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A stored document did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// MongoDB driver errors (wrapped).
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}
