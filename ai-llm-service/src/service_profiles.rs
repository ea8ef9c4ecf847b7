//! Shared LLM service with two active profiles: `chat` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Builds one HTTP client per profile up front, so a bad config fails at
//!   startup instead of on the first request.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::service_profiles::LlmServiceProfiles;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let svc = Arc::new(LlmServiceProfiles::from_env()?);
//!
//!     let txt = svc.generate("Extract keywords: rainy noir city", None).await?;
//!     println!("CHAT: {}", txt);
//!
//!     let emb = svc.embed("rainy, noir, city").await?;
//!     println!("Embedding dim = {}", emb.len());
//!     Ok(())
//! }
//! ```

use crate::{
    config::{
        default_config::{config_openai_chat, config_openai_embedding},
        llm_model_config::LlmModelConfig,
    },
    error_handler::AiLlmError,
    services::open_ai_service::OpenAiService,
};

/// Shared service that manages the **chat** and **embedding** profiles.
#[derive(Debug)]
pub struct LlmServiceProfiles {
    chat: OpenAiService,
    embedding: OpenAiService,
}

impl LlmServiceProfiles {
    /// Creates a new service from explicit profiles.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if either client cannot be constructed.
    pub fn new(chat: LlmModelConfig, embedding: LlmModelConfig) -> Result<Self, AiLlmError> {
        Ok(Self {
            chat: OpenAiService::new(chat)?,
            embedding: OpenAiService::new(embedding)?,
        })
    }

    /// Creates the service from `OPENAI_*` / `EMBEDDING_*` environment variables.
    pub fn from_env() -> Result<Self, AiLlmError> {
        Self::new(config_openai_chat()?, config_openai_embedding()?)
    }

    /// Generates text using the **chat** profile.
    ///
    /// # Arguments
    /// - `prompt`: user message.
    /// - `system`: optional system instruction.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if generation fails.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        self.chat.generate(prompt, system).await
    }

    /// Computes embeddings using the **embedding** profile.
    pub async fn embed(&self, input: &str) -> Result<Vec<f64>, AiLlmError> {
        self.embedding.embeddings(input).await
    }

    /// Vector size requested from the embedding profile, if configured.
    pub fn embedding_dimensions(&self) -> Option<u32> {
        self.embedding.config().dimensions
    }

    /// Returns references to the current profiles `(chat, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (self.chat.config(), self.embedding.config())
    }
}
