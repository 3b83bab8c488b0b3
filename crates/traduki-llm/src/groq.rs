//! Groq adapter (OpenAI-compatible chat completions).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::traits::{ChatMessage, ChatResponse, FinishReason, LlmAdapter, Role, TokenUsage};

/// Default endpoint for Groq's OpenAI-compatible API.
pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Adapter for Groq-hosted models.
pub struct GroqAdapter {
    client: Client,
    config: LlmConfig,
}

impl GroqAdapter {
    /// Create a new Groq adapter.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Groq API key
    /// * `model` - Model to use (e.g. "llama-3.3-70b-versatile")
    #[must_use]
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::from_config(LlmConfig::groq(&model.into()).with_api_key(api_key))
    }

    /// Create from a full configuration.
    #[must_use]
    pub fn from_config(config: LlmConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Set the temperature for generation.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Set the maximum tokens for generation.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    /// Convert our message format to the wire format.
    fn convert_messages(messages: &[ChatMessage]) -> Vec<WireMessage> {
        messages
            .iter()
            .map(|msg| WireMessage {
                role: match msg.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                }
                .to_string(),
                content: msg.content.clone(),
            })
            .collect()
    }

    fn map_status(status: reqwest::StatusCode, message: String) -> LlmError {
        match status.as_u16() {
            401 | 403 => LlmError::AuthenticationError(message),
            429 => LlmError::RateLimitError(message),
            _ => LlmError::ApiError(message),
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    model: String,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: WireMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[async_trait]
impl LlmAdapter for GroqAdapter {
    fn provider(&self) -> &str {
        "groq"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    #[instrument(skip(self, messages), fields(provider = "groq", model = %self.config.model))]
    async fn generate(&self, messages: &[ChatMessage]) -> Result<ChatResponse, LlmError> {
        debug!("requesting completion with {} messages", messages.len());

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: Self::convert_messages(messages),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(&self.config.base_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(Self::map_status(status, message));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let choice = body.choices.into_iter().next().ok_or(LlmError::EmptyResponse)?;
        let usage = body.usage.unwrap_or_default();

        Ok(ChatResponse {
            content: choice.message.content,
            tokens_used: TokenUsage {
                prompt: usage.prompt_tokens,
                completion: usage.completion_tokens,
                total: usage.total_tokens,
            },
            finish_reason: match choice.finish_reason.as_deref() {
                Some("length") => FinishReason::Length,
                _ => FinishReason::Stop,
            },
            model: body.model,
        })
    }

    async fn health_check(&self) -> Result<bool, LlmError> {
        // Models listing lives next to the chat endpoint on every
        // OpenAI-compatible server.
        let url = self.config.base_url.replace("/chat/completions", "/models");
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| LlmError::ConnectionError(e.to_string()))?;

        Ok(response.status().is_success())
    }
}
