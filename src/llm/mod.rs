//! Text generation backends.
//!
//! `LlmBackend` abstracts over the provider so the prompt handlers can be driven by a real
//! OpenAI-compatible API, a disabled stand-in, or a scripted backend in tests.

mod openai;

#[cfg(test)]
pub mod mock;

pub use openai::OpenAiBackend;

use async_trait::async_trait;

/// Error types for text generation.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Generation is not configured or the provider cannot be used
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// The provider answered with HTTP 429
    #[error("Rate limited by the text generation provider")]
    RateLimited,

    /// The provider answered with a non-success status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The request never got an answer
    #[error("Network error: {0}")]
    Network(String),

    /// The provider's answer could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A single-turn completion: optional system instructions plus one user prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub prompt: String,
    /// Sampling temperature (0.0-2.0)
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    /// Create a request for a user prompt at the default temperature of 0.7.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature: 0.7,
            max_tokens: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Core trait for text generation backends.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Backend identifier, usually the model name.
    fn id(&self) -> &str;

    /// Generate a completion and return its text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}

/// Backend used when no API key is configured; every call fails with `Unavailable`.
pub struct DisabledBackend;

#[async_trait]
impl LlmBackend for DisabledBackend {
    fn id(&self) -> &str {
        "disabled"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<String, LlmError> {
        Err(LlmError::Unavailable(
            "Text generation is not configured".to_string(),
        ))
    }
}
