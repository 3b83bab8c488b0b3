//! LLM error types.

use thiserror::Error;

use traduki_core::CapabilityError;

/// Errors that can occur when talking to an LLM provider.
#[derive(Error, Debug)]
pub enum LlmError {
    /// API error from the provider
    #[error("API error: {0}")]
    ApiError(String),

    /// Network/connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),

    /// Empty response from provider
    #[error("Empty response from LLM")]
    EmptyResponse,

    /// Invalid response format
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Timeout
    #[error("Request timed out")]
    Timeout,

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Fold provider failures into the capability contract the pipeline sees:
/// timeouts keep their identity, everything else means "unavailable".
impl From<LlmError> for CapabilityError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Timeout => CapabilityError::Timeout,
            other => CapabilityError::Unavailable(other.to_string()),
        }
    }
}
