//! Glue: recent window → keyword extraction → embedding.

use std::{sync::Arc, time::Instant};

use ai_llm_service::LlmServiceProfiles;
use query_history::{HistoryStore, RecentWindow, WINDOW_SIZE};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    embedder::{EmbeddingGenerator, LlmEmbeddingGenerator},
    error::PipelineError,
    extractor::{KeywordExtractor, LlmKeywordExtractor},
};

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordEmbedding {
    /// Extracted keywords, in model order.
    pub keywords: Vec<String>,
    /// Embedding of the comma-joined keywords.
    pub vector: Vec<f64>,
    /// The window's three indices slots, unchanged.
    pub indices: [String; WINDOW_SIZE],
}

/// Extraction + embedding with injected providers.
#[derive(Clone)]
pub struct KeywordPipeline {
    extractor: Arc<dyn KeywordExtractor>,
    embedder: Arc<dyn EmbeddingGenerator>,
}

impl KeywordPipeline {
    pub fn new(extractor: Arc<dyn KeywordExtractor>, embedder: Arc<dyn EmbeddingGenerator>) -> Self {
        Self { extractor, embedder }
    }

    /// Pipeline using the chat and embedding profiles of one shared service.
    pub fn from_llm(svc: Arc<LlmServiceProfiles>) -> Self {
        Self::new(
            Arc::new(LlmKeywordExtractor::new(svc.clone())),
            Arc::new(LlmEmbeddingGenerator::new(svc)),
        )
    }

    /// Direct-input variant: slot 1 is the current query, non-empty slots
    /// 2–3 are the previous ones.
    ///
    /// # Errors
    /// Any extractor/embedder failure, unchanged. Nothing is retried.
    pub async fn run(&self, window: &RecentWindow) -> Result<KeywordEmbedding, PipelineError> {
        let started = Instant::now();
        let previous = window.previous_queries();
        let current = window.current_query();

        let keywords = self.extractor.extract(&previous, current).await?;
        let vector = self.embedder.embed(&keywords).await?;

        info!(
            previous = previous.len(),
            keywords = keywords.len(),
            dim = vector.len(),
            latency_ms = started.elapsed().as_millis(),
            "keyword embedding completed"
        );

        Ok(KeywordEmbedding {
            keywords,
            vector,
            indices: window.indices(),
        })
    }

    /// Store-mediated variant: appends the new query, then runs on the
    /// updated recent window.
    pub async fn run_for_user(
        &self,
        store: &dyn HistoryStore,
        user_id: &str,
        query: &str,
        indices: &[String],
    ) -> Result<(RecentWindow, KeywordEmbedding), PipelineError> {
        let window = store.append(user_id, query, indices).await?;
        let out = self.run(&window).await?;
        Ok((window, out))
    }
}
