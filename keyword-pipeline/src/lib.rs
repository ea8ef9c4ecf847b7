//! Keyword extraction + embedding over a user's recent queries.
//!
//! Public API:
//! - [`KeywordPipeline::run`]: direct-input variant (three slots given by the caller)
//! - [`KeywordPipeline::run_for_user`]: store-mediated variant (append, then run)
//! - [`batch`]: the same store-mediated flow driven by a JSON file
//!
//! Providers are injected as [`KeywordExtractor`] / [`EmbeddingGenerator`]
//! trait objects; [`KeywordPipeline::from_llm`] wires the OpenAI-backed ones.

pub mod batch;
pub mod embedder;
pub mod error;
pub mod extractor;
pub mod pipeline;
pub mod prompt;

pub use embedder::{EmbeddingGenerator, LlmEmbeddingGenerator};
pub use error::PipelineError;
pub use extractor::{KeywordExtractor, LlmKeywordExtractor, PipelineFuture, parse_keywords};
pub use pipeline::{KeywordEmbedding, KeywordPipeline};
