//! Intent service backed by a chat-completion adapter.
//!
//! Owns the per-operation prompts and the lenient decoding of model output.
//! Responses that are not valid JSON come back as a plain string payload;
//! the pipeline stages treat that as a malformed document and degrade on
//! their side, which keeps formatting drift from aborting a conversion.

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use traduki_core::{strip_code_fence, CapabilityError, IntentGraph, IntentService};

use crate::traits::{ChatMessage, LlmAdapter};

const PARSE_SYSTEM_PROMPT: &str = r#"You are a code structure analyzer.

Given a piece of source code, extract:
1. Variables and their purposes
2. Data structures in use (dataframes, lists, arrays, ...)
3. Operations performed (transformations, calculations, ...)
4. Libraries/packages in use
5. Control flow (conditionals, loops)
6. Inputs (files, databases, other data sources)
7. Outputs (what the code produces)

IMPORTANT: Respond ONLY with valid JSON, no explanations before or after.

Output format:
{
  "variables": ["names"],
  "data_structures": ["types"],
  "operations": [{"type": "operation_type", "details": "description"}],
  "libraries": ["names"],
  "control_flow": ["descriptions"],
  "inputs": ["sources"],
  "outputs": ["products"]
}"#;

const EXTRACT_SYSTEM_PROMPT: &str = r#"You are an expert at understanding developer intent.

Extract HIGH-LEVEL intentions from code, never syntax details. Think about
WHAT the developer wanted to achieve, not HOW they coded it. Every intention
must be language-agnostic: no mention of specific functions or syntax.

IMPORTANT: Respond ONLY with valid JSON, no explanations.

Output format:
{
  "intents": [
    {
      "id": "intent_1",
      "type": "data_loading|transformation|aggregation|filtering|visualization|other",
      "description": "what the developer wants to achieve",
      "parameters": {"name": "value"},
      "depends_on": []
    }
  ],
  "data_flow": {"intent_1": ["intent_2"]},
  "overall_goal": "one sentence: what does this code accomplish?"
}"#;

const VALIDATE_SYSTEM_PROMPT: &str = r#"You are a code review and quality assurance specialist.

Review extracted intentions for:
1. COMPLETENESS: are all operations from the code captured?
2. CONSISTENCY: do the dependencies between intentions make sense?
3. CLARITY: are the descriptions unambiguous and language-agnostic?
4. DATA FLOW: does the flow graph make logical sense?

IMPORTANT: Respond ONLY with valid JSON.

Output format:
{
  "valid": true,
  "issues": [
    {
      "type": "missing_operation|unclear_description|invalid_dependency",
      "severity": "critical|warning|info",
      "description": "explanation of the issue",
      "suggestion": "how to fix it"
    }
  ],
  "assessment": "brief summary"
}

Set valid=false or report a critical issue when the intentions need another
extraction pass before code generation."#;

/// Intent-generation capability backed by an [`LlmAdapter`].
pub struct LlmIntentService<A: LlmAdapter> {
    adapter: A,
}

impl<A: LlmAdapter> LlmIntentService<A> {
    pub fn new(adapter: A) -> Self {
        Self { adapter }
    }

    /// Access the underlying adapter (e.g. for health checks).
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    async fn complete(&self, system: &str, user: String) -> Result<String, CapabilityError> {
        let messages = [ChatMessage::system(system), ChatMessage::user(user)];
        let response = self
            .adapter
            .generate(&messages)
            .await
            .map_err(CapabilityError::from)?;
        Ok(response.content)
    }
}

/// Decode model output into JSON, falling back to a plain string payload
/// when the content does not parse. The fallback is deliberate: the stages
/// recognize the shape mismatch and substitute their degraded defaults.
fn decode_json(content: &str) -> Value {
    let cleaned = strip_code_fence(content);
    match serde_json::from_str(&cleaned) {
        Ok(value) => value,
        Err(err) => {
            warn!(%err, "capability response was not valid JSON, passing raw text through");
            Value::String(cleaned)
        }
    }
}

fn parse_user_prompt(code: &str, language: &str) -> String {
    format!(
        "Analyze this {language} code:\n\n```{language}\n{code}\n```\n\n\
         Extract the structural information as JSON."
    )
}

fn extract_user_prompt(parsed: &Value, code: &str, language: &str) -> String {
    format!(
        "Based on this code analysis, extract the HIGH-LEVEL intentions:\n\n\
         Source Language: {language}\n\n\
         Parsed Code Structure:\n{structure}\n\n\
         Original Code:\n```{language}\n{code}\n```\n\n\
         Extract WHAT the developer wanted to do, not the syntax they used.\n\
         Return ONLY valid JSON with the intent graph.",
        structure = serde_json::to_string_pretty(parsed).unwrap_or_default(),
    )
}

fn validate_user_prompt(graph: &IntentGraph, parsed: &Value, code: &str) -> String {
    format!(
        "Review these extracted intentions for quality and completeness:\n\n\
         INTENT GRAPH:\n{graph}\n\n\
         PARSED CODE STRUCTURE (for comparison):\n{structure}\n\n\
         ORIGINAL CODE (for reference):\n{code}\n\n\
         Return ONLY valid JSON with your validation result.",
        graph = serde_json::to_string_pretty(graph).unwrap_or_default(),
        structure = serde_json::to_string_pretty(parsed).unwrap_or_default(),
    )
}

fn generate_system_prompt(target_language: &str) -> String {
    format!(
        "You are an expert {target_language} developer.\n\n\
         Generate production-quality, IDIOMATIC {target_language} code from \
         high-level intentions.\n\n\
         RULES:\n\
         1. Write idiomatic {target_language}, never a literal translation\n\
         2. Use the libraries a native developer would reach for\n\
         3. Include all necessary imports\n\
         4. Keep the code clean, readable and maintainable\n\n\
         Output ONLY the code, with no explanations before or after."
    )
}

fn generate_user_prompt(graph: &IntentGraph, code: &str, source_language: &str, target_language: &str) -> String {
    format!(
        "Generate {target_language} code based on these intentions:\n\n\
         INTENTIONS:\n{graph}\n\n\
         OVERALL GOAL: {goal}\n\n\
         ORIGINAL {source_language} CODE (context only - do NOT translate directly):\n\
         ```{source_language}\n{code}\n```\n\n\
         Write as a native {target_language} developer would. Output ONLY the code:",
        graph = serde_json::to_string_pretty(graph).unwrap_or_default(),
        goal = if graph.overall_goal.is_empty() {
            "accomplish what the original code does"
        } else {
            graph.overall_goal.as_str()
        },
    )
}

#[async_trait]
impl<A: LlmAdapter> IntentService for LlmIntentService<A> {
    async fn structural_parse(
        &self,
        code: &str,
        language: &str,
    ) -> Result<Value, CapabilityError> {
        let content = self
            .complete(PARSE_SYSTEM_PROMPT, parse_user_prompt(code, language))
            .await?;
        Ok(decode_json(&content))
    }

    async fn extract_intent(
        &self,
        parsed: &Value,
        code: &str,
        language: &str,
    ) -> Result<Value, CapabilityError> {
        let content = self
            .complete(
                EXTRACT_SYSTEM_PROMPT,
                extract_user_prompt(parsed, code, language),
            )
            .await?;
        Ok(decode_json(&content))
    }

    async fn validate(
        &self,
        graph: &IntentGraph,
        parsed: &Value,
        code: &str,
    ) -> Result<Value, CapabilityError> {
        let content = self
            .complete(
                VALIDATE_SYSTEM_PROMPT,
                validate_user_prompt(graph, parsed, code),
            )
            .await?;
        Ok(decode_json(&content))
    }

    async fn generate(
        &self,
        graph: &IntentGraph,
        code: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, CapabilityError> {
        self.complete(
            &generate_system_prompt(target_language),
            generate_user_prompt(graph, code, source_language, target_language),
        )
        .await
    }
}
