//! # traduki-llm
//!
//! The intent-generation capability behind the conversion pipeline,
//! implemented over an LLM chat-completion API.
//!
//! Provides:
//! - [`LlmAdapter`] - provider abstraction for chat completions
//! - [`GroqAdapter`] - adapter for Groq's OpenAI-compatible API
//! - [`LlmIntentService`] - prompt construction and lenient response
//!   decoding, implementing `traduki_core::IntentService`

mod config;
mod error;
mod groq;
mod service;
mod traits;

pub use config::LlmConfig;
pub use error::LlmError;
pub use groq::{GroqAdapter, GROQ_API_URL};
pub use service::LlmIntentService;
pub use traits::{ChatMessage, ChatResponse, FinishReason, LlmAdapter, Role, TokenUsage};
