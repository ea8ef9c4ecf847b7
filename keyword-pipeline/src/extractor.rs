//! Keyword extraction through a chat model.

use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::LlmServiceProfiles;
use tracing::debug;

use crate::{error::PipelineError, prompt};

/// Boxed future used by the pipeline's provider traits.
pub type PipelineFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, PipelineError>> + Send + 'a>>;

/// Turns the current query (plus context) into keywords.
pub trait KeywordExtractor: Send + Sync {
    fn extract<'a>(
        &'a self,
        previous_queries: &'a [String],
        current_query: &'a str,
    ) -> PipelineFuture<'a, Vec<String>>;
}

/// Splits a model reply into keywords: one per line, trimmed, blanks dropped.
///
/// Lines are accepted as-is otherwise; a model that answers with a sentence
/// yields that sentence as a keyword.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// [`KeywordExtractor`] backed by the chat profile of [`LlmServiceProfiles`].
#[derive(Clone)]
pub struct LlmKeywordExtractor {
    svc: Arc<LlmServiceProfiles>,
}

impl LlmKeywordExtractor {
    pub fn new(svc: Arc<LlmServiceProfiles>) -> Self {
        Self { svc }
    }
}

impl KeywordExtractor for LlmKeywordExtractor {
    fn extract<'a>(
        &'a self,
        previous_queries: &'a [String],
        current_query: &'a str,
    ) -> PipelineFuture<'a, Vec<String>> {
        Box::pin(async move {
            let user_prompt = prompt::build_user_prompt(previous_queries, current_query);
            let raw = self
                .svc
                .generate(&user_prompt, Some(prompt::DEFAULT_SYSTEM))
                .await?;

            let keywords = parse_keywords(&raw);
            debug!(
                previous = previous_queries.len(),
                keywords = keywords.len(),
                "keywords extracted"
            );
            Ok(keywords)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_dropped_and_lines_trimmed() {
        let raw = "\n  gothic  \n\n\tatmospheric\r\n   \nold mansion\n";
        assert_eq!(
            parse_keywords(raw),
            vec!["gothic", "atmospheric", "old mansion"]
        );
    }

    #[test]
    fn whitespace_only_reply_has_no_keywords() {
        assert!(parse_keywords("   \n\n \t").is_empty());
        assert!(parse_keywords("").is_empty());
    }

    #[test]
    fn free_text_lines_are_kept() {
        let raw = "Keywords: noir, rain";
        assert_eq!(parse_keywords(raw), vec!["Keywords: noir, rain"]);
    }
}
