use std::sync::Arc;

use keyword_pipeline::KeywordPipeline;
use query_history::HistoryStore;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Extraction + embedding providers.
    pub pipeline: KeywordPipeline,
    /// Per-user query history.
    pub store: Arc<dyn HistoryStore>,
}

impl AppState {
    pub fn new(pipeline: KeywordPipeline, store: Arc<dyn HistoryStore>) -> Self {
        Self { pipeline, store }
    }
}
