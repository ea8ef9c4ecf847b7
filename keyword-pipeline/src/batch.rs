//! File-driven ingestion of a single new query.
//!
//! The input is one JSON object:
//!
//! ```json
//! { "user_id": 42, "query": "gothic atmospheric mansion", "indices": [10, "11"] }
//! ```
//!
//! - `user_id` may be any JSON scalar and is coerced to a string; `null`,
//!   missing or blank means "no user".
//! - `query` may also arrive under the older `quarry` key, and older files
//!   wrap it in a one-element array.
//! - `indices` items of any type are coerced to strings.

use std::path::Path;

use query_history::{HistoryError, HistoryStore, RecentWindow};
use serde_json::Value;
use tracing::info;

use crate::{
    error::PipelineError,
    pipeline::{KeywordEmbedding, KeywordPipeline},
};

const QUERY_KEYS: [&str; 2] = ["query", "quarry"];

/// Parsed batch input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFile {
    pub user_id: String,
    pub query: String,
    pub indices: Vec<String>,
}

impl QueryFile {
    /// Coerces a JSON object into a [`QueryFile`].
    ///
    /// # Errors
    /// - [`PipelineError::InvalidInput`] if `value` is not an object
    /// - [`PipelineError::History`] with `MissingUserId` if there is no usable `user_id`
    pub fn from_value(value: &Value) -> Result<Self, PipelineError> {
        let obj = value
            .as_object()
            .ok_or_else(|| PipelineError::InvalidInput("batch file must contain a JSON object".into()))?;

        let user_id = obj
            .get("user_id")
            .and_then(scalar_text)
            .filter(|s| !s.trim().is_empty())
            .ok_or(HistoryError::MissingUserId)?;

        let query = QUERY_KEYS
            .iter()
            .find_map(|k| obj.get(*k))
            .map(|v| match v {
                Value::Array(items) => items.first().and_then(scalar_text).unwrap_or_default(),
                other => scalar_text(other).unwrap_or_default(),
            })
            .unwrap_or_default();

        let indices = match obj.get("indices") {
            Some(Value::Array(items)) => items.iter().map(any_text).collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![any_text(other)],
        };

        Ok(Self {
            user_id,
            query,
            indices,
        })
    }

    /// Reads and parses a batch file.
    pub async fn load(path: &Path) -> Result<Self, PipelineError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let value: Value = serde_json::from_str(&raw)?;
        let file = Self::from_value(&value)?;
        info!(
            path = %path.display(),
            user_id = %file.user_id,
            indices = file.indices.len(),
            "batch file loaded"
        );
        Ok(file)
    }
}

/// Appends the file's query to the store and returns the updated window.
pub async fn append_from_file(
    path: &Path,
    store: &dyn HistoryStore,
) -> Result<(QueryFile, RecentWindow), PipelineError> {
    let file = QueryFile::load(path).await?;
    let window = store.append(&file.user_id, &file.query, &file.indices).await?;
    Ok((file, window))
}

/// Store-mediated pipeline for one batch file.
pub async fn ingest_file(
    path: &Path,
    store: &dyn HistoryStore,
    pipeline: &KeywordPipeline,
) -> Result<(RecentWindow, KeywordEmbedding), PipelineError> {
    let file = QueryFile::load(path).await?;
    pipeline
        .run_for_user(store, &file.user_id, &file.query, &file.indices)
        .await
}

/// Text of a JSON scalar; `null` has none.
fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn any_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
