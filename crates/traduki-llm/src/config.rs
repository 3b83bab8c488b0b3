//! Provider configuration.

use crate::groq::GROQ_API_URL;

/// Configuration for a chat-completion provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmConfig {
    /// Groq config with deterministic-generation defaults.
    /// Temperature is 0 so identical inputs convert identically.
    pub fn groq(model: &str) -> Self {
        Self {
            model: model.into(),
            api_key: std::env::var("GROQ_API_KEY").unwrap_or_default(),
            base_url: GROQ_API_URL.into(),
            temperature: 0.0,
            max_tokens: 4096,
        }
    }

    /// Set temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set max tokens.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Point at a different (OpenAI-compatible) endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
