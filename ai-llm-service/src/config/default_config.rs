//! Default model configs loaded strictly from environment variables.
//!
//! Two roles are used by the service:
//!
//! - **Chat**      → keyword extraction (chat completions)
//! - **Embedding** → vector generation for the extracted keywords
//!
//! # Environment variables
//!
//! Common:
//! - `OPENAI_API_KEY`   = API key (mandatory)
//! - `OPENAI_BASE_URL`  = API base URL (default `https://api.openai.com`)
//! - `LLM_TIMEOUT_SECS` = optional request timeout (u64, default 60)
//!
//! Chat:
//! - `OPENAI_CHAT_MODEL` = chat model (default `gpt-3.5-turbo`)
//! - `LLM_MAX_TOKENS`    = optional max tokens (u32)
//!
//! Embedding:
//! - `OPENAI_EMBEDDING_MODEL` = embedding model (default `text-embedding-3-large`)
//! - `EMBEDDING_DIMENSIONS`   = vector size (default 512)

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{Result, env_opt_u32, env_opt_u64, env_or, must_env},
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-large";
pub const DEFAULT_EMBEDDING_DIMENSIONS: u32 = 512;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Constructs the config for the **chat** model used for keyword extraction.
///
/// # Env
/// - `OPENAI_API_KEY` (required)
/// - `OPENAI_CHAT_MODEL`, `OPENAI_BASE_URL`, `LLM_MAX_TOKENS`, `LLM_TIMEOUT_SECS` (optional)
///
/// # Errors
/// [`crate::ConfigError`] variants for missing key, bad numbers or bad URL.
pub fn config_openai_chat() -> Result<LlmModelConfig> {
    let cfg = LlmModelConfig {
        model: env_or("OPENAI_CHAT_MODEL", DEFAULT_CHAT_MODEL),
        endpoint: env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL),
        api_key: Some(must_env("OPENAI_API_KEY")?),
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: None,
        top_p: None,
        dimensions: None,
        timeout_secs: Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Constructs the config for the **embedding** model.
///
/// # Env
/// - `OPENAI_API_KEY` (required)
/// - `OPENAI_EMBEDDING_MODEL`, `EMBEDDING_DIMENSIONS`, `OPENAI_BASE_URL`,
///   `LLM_TIMEOUT_SECS` (optional)
pub fn config_openai_embedding() -> Result<LlmModelConfig> {
    let cfg = LlmModelConfig {
        model: env_or("OPENAI_EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
        endpoint: env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL),
        api_key: Some(must_env("OPENAI_API_KEY")?),
        max_tokens: None,
        temperature: None,
        top_p: None,
        dimensions: Some(env_opt_u32("EMBEDDING_DIMENSIONS")?.unwrap_or(DEFAULT_EMBEDDING_DIMENSIONS)),
        timeout_secs: Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    };
    cfg.validate()?;
    Ok(cfg)
}
