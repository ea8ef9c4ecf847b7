//! Embedding generation for an extracted keyword list.

use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use tracing::debug;

use crate::{error::PipelineError, extractor::PipelineFuture};

/// Separator used when keywords are sent as one embedding input.
pub const KEYWORD_SEPARATOR: &str = ", ";

/// Turns a keyword list into a fixed-size vector.
pub trait EmbeddingGenerator: Send + Sync {
    fn embed<'a>(&'a self, keywords: &'a [String]) -> PipelineFuture<'a, Vec<f64>>;
}

/// Joins keywords the way they are embedded.
pub fn embedding_input(keywords: &[String]) -> String {
    keywords.join(KEYWORD_SEPARATOR)
}

/// Checks the vector size at the boundary.
pub fn check_dimension(vector: &[f64], want: usize) -> Result<(), PipelineError> {
    if vector.len() == want {
        Ok(())
    } else {
        Err(PipelineError::DimensionMismatch {
            got: vector.len(),
            want,
        })
    }
}

/// [`EmbeddingGenerator`] backed by the embedding profile of
/// [`LlmServiceProfiles`].
#[derive(Clone)]
pub struct LlmEmbeddingGenerator {
    svc: Arc<LlmServiceProfiles>,
    dim: Option<usize>,
}

impl LlmEmbeddingGenerator {
    /// Expected size is taken from the embedding profile's `dimensions`.
    pub fn new(svc: Arc<LlmServiceProfiles>) -> Self {
        let dim = svc.embedding_dimensions().map(|d| d as usize);
        Self { svc, dim }
    }
}

impl EmbeddingGenerator for LlmEmbeddingGenerator {
    fn embed<'a>(&'a self, keywords: &'a [String]) -> PipelineFuture<'a, Vec<f64>> {
        Box::pin(async move {
            let input = embedding_input(keywords);
            let vector = self.svc.embed(&input).await?;

            if let Some(want) = self.dim {
                check_dimension(&vector, want)?;
            }
            debug!(dim = vector.len(), input_len = input.len(), "keywords embedded");
            Ok(vector)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_joined_with_comma_space() {
        let kw = vec!["gothic".to_string(), "old mansion".to_string()];
        assert_eq!(embedding_input(&kw), "gothic, old mansion");
        assert_eq!(embedding_input(&[]), "");
    }

    #[test]
    fn dimension_mismatch_is_typed() {
        assert!(check_dimension(&[0.0; 512], 512).is_ok());
        assert!(matches!(
            check_dimension(&[0.0; 3], 512),
            Err(PipelineError::DimensionMismatch { got: 3, want: 512 })
        ));
    }
}
