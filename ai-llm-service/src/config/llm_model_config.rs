use crate::error_handler::{ConfigError, Result, validate_http_endpoint, validate_range_f32};

/// Configuration for one model invocation profile (chat or embeddings).
///
/// # Fields
///
/// - `model`: The model identifier (e.g., `"gpt-3.5-turbo"`, `"text-embedding-3-large"`).
/// - `endpoint`: Base URL of the OpenAI-compatible API (without `/v1`).
/// - `api_key`: Optional API key (required by the hosted OpenAI API).
/// - `max_tokens`: Maximum number of tokens to generate (chat only).
/// - `temperature`: Controls randomness (chat only).
/// - `top_p`: Nucleus sampling cutoff (chat only).
/// - `dimensions`: Requested embedding size (embeddings only).
/// - `timeout_secs`: Optional request timeout in seconds.
///
/// # Examples
///
/// ```
/// use ai_llm_service::LlmModelConfig;
///
/// let cfg = LlmModelConfig {
///     model: "text-embedding-3-large".to_string(),
///     endpoint: "https://api.openai.com".to_string(),
///     api_key: Some("sk-...".to_string()),
///     max_tokens: None,
///     temperature: None,
///     top_p: None,
///     dimensions: Some(512),
///     timeout_secs: Some(30),
/// };
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// Model identifier string.
    pub model: String,

    /// Remote API base URL.
    pub endpoint: String,

    /// Optional API key for authentication.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature (controls creativity).
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Embedding vector size requested from the provider.
    pub dimensions: Option<u32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Checks the fields that would otherwise only fail on the first request.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }
        validate_http_endpoint("endpoint", self.endpoint.trim())?;
        if let Some(t) = self.temperature {
            validate_range_f32("temperature", t, 0.0, 2.0)?;
        }
        if let Some(p) = self.top_p {
            validate_range_f32("top_p", p, 0.0, 1.0)?;
        }
        if self.dimensions == Some(0) {
            return Err(ConfigError::OutOfRange {
                field: "dimensions",
                detail: "expected a positive vector size",
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::AiLlmError;

    fn base() -> LlmModelConfig {
        LlmModelConfig {
            model: "gpt-3.5-turbo".into(),
            endpoint: "https://api.openai.com".into(),
            api_key: Some("sk-test".into()),
            max_tokens: None,
            temperature: Some(0.2),
            top_p: None,
            dimensions: None,
            timeout_secs: Some(60),
        }
    }

    #[test]
    fn empty_model_is_rejected() {
        let cfg = LlmModelConfig {
            model: "  ".into(),
            ..base()
        };
        assert!(matches!(
            cfg.validate(),
            Err(AiLlmError::Config(ConfigError::EmptyModel))
        ));
    }

    #[test]
    fn zero_dimensions_is_rejected() {
        let cfg = LlmModelConfig {
            dimensions: Some(0),
            ..base()
        };
        assert!(cfg.validate().is_err());
        assert!(base().validate().is_ok());
    }
}
