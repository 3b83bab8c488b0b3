//! Contract for the opaque intent-generation capability.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CapabilityError;
use crate::types::IntentGraph;

/// The external text-generation capability each pipeline stage calls.
///
/// Implementations live outside the core (the `traduki-llm` crate provides
/// one backed by a chat-completion API). The payload-returning operations
/// hand back whatever the provider produced, possibly a document that does
/// not match the expected shape. Stages decode at their own boundary and
/// degrade on failure; only a raised [`CapabilityError`] aborts a run.
///
/// Implementations must be safe for concurrent invocation from independent
/// runs.
#[async_trait]
pub trait IntentService: Send + Sync {
    /// Analyze the structure of `code`: variables, operations, libraries,
    /// control flow, inputs and outputs.
    async fn structural_parse(&self, code: &str, language: &str)
        -> Result<Value, CapabilityError>;

    /// Distill language-agnostic intents from the parsed structure.
    async fn extract_intent(
        &self,
        parsed: &Value,
        code: &str,
        language: &str,
    ) -> Result<Value, CapabilityError>;

    /// Review an intent graph for completeness and consistency against the
    /// parsed structure and the original code.
    async fn validate(
        &self,
        graph: &IntentGraph,
        parsed: &Value,
        code: &str,
    ) -> Result<Value, CapabilityError>;

    /// Produce idiomatic code in the target language from the intent graph.
    async fn generate(
        &self,
        graph: &IntentGraph,
        code: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, CapabilityError>;
}
