//! Run configuration

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, TranslationError};
use crate::core::retry::RetryPolicy;

/// Default OpenRouter chat-completions endpoint
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Configuration for one translation run.
///
/// Constructed once from CLI input and the environment; immutable for the
/// duration of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Model identifier, e.g. `openai/gpt-4o-mini`
    pub model: String,
    /// Bearer token for the completion endpoint
    pub api_key: String,
    /// Completion endpoint URL
    pub api_endpoint: String,
    /// Maximum tokens per completion
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum concurrently in-flight requests
    pub max_concurrent: usize,
    /// Per-attempt request timeout in milliseconds
    pub timeout_ms: u64,
    /// Backoff policy for transient failures
    pub retry: RetryPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            api_key: std::env::var("OPENROUTER_API_KEY").unwrap_or_default(),
            api_endpoint: std::env::var("OPENROUTER_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            max_tokens: 1000,
            temperature: 0.1,
            max_concurrent: 15,
            timeout_ms: 30_000,
            retry: RetryPolicy::default(),
        }
    }
}

impl RunConfig {
    /// Create a configuration for the given model, with environment-backed
    /// defaults for everything else
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Validate the configuration before any dispatch begins
    pub fn validate(&self) -> Result<()> {
        if self.model.is_empty() {
            return Err(TranslationError::ConfigError {
                message: "model identifier is required".to_string(),
            });
        }

        if self.api_key.is_empty() {
            return Err(TranslationError::ConfigError {
                message: "API key is required (--api-key or OPENROUTER_API_KEY)".to_string(),
            });
        }

        if self.api_endpoint.is_empty() {
            return Err(TranslationError::ConfigError {
                message: "API endpoint is required".to_string(),
            });
        }

        if self.max_concurrent == 0 {
            return Err(TranslationError::ConfigError {
                message: "max_concurrent must be greater than 0".to_string(),
            });
        }

        if self.retry.max_attempts == 0 {
            return Err(TranslationError::ConfigError {
                message: "retry.max_attempts must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}
