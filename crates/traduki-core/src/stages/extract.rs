//! Intent extraction stage.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::Stage;
use crate::capability::IntentService;
use crate::error::CapabilityError;
use crate::state::ConversionState;
use crate::types::IntentGraph;

/// Second stage: distill language-agnostic intents from the parsed structure.
///
/// Overwrites `intent_graph` on every attempt and increments the iteration
/// counter. This is the only place in the pipeline the counter moves,
/// whether this is the initial pass or a retry.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractIntent;

#[async_trait]
impl Stage for ExtractIntent {
    fn name(&self) -> &'static str {
        "extract_intent"
    }

    async fn run(
        &self,
        state: &mut ConversionState,
        service: &dyn IntentService,
    ) -> Result<(), CapabilityError> {
        let payload = service
            .extract_intent(
                &state.parsed_structure,
                &state.source_code,
                &state.source_language,
            )
            .await?;

        state.intent_graph = decode_graph(payload);
        state.iteration_count += 1;

        debug!(
            iteration = state.iteration_count,
            intents = state.intent_graph.intents.len(),
            degraded = state.intent_graph.degraded,
            "intent graph updated"
        );

        Ok(())
    }
}

fn decode_graph(payload: Value) -> IntentGraph {
    match serde_json::from_value::<IntentGraph>(payload.clone()) {
        Ok(graph) => graph,
        Err(err) => {
            warn!(%err, "intent payload did not decode, keeping raw response");
            IntentGraph::degraded(payload_text(&payload))
        }
    }
}

fn payload_text(payload: &Value) -> String {
    match payload {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedService;
    use serde_json::json;
    use std::sync::atomic::Ordering;

    fn state() -> ConversionState {
        ConversionState::new("x <- 1:10\nprint(sum(x))", "R", "Python", 3)
    }

    #[tokio::test]
    async fn test_well_formed_graph_is_decoded() {
        let service = ScriptedService::default();
        let mut state = state();

        ExtractIntent.run(&mut state, &service).await.unwrap();

        assert_eq!(state.intent_graph.intents.len(), 1);
        assert!(!state.intent_graph.degraded);
        assert_eq!(state.iteration_count, 1);
    }

    #[tokio::test]
    async fn test_counter_moves_once_per_attempt() {
        let service = ScriptedService::default();
        let mut state = state();

        ExtractIntent.run(&mut state, &service).await.unwrap();
        ExtractIntent.run(&mut state, &service).await.unwrap();

        assert_eq!(state.iteration_count, 2);
        assert_eq!(service.extract_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_malformed_payload_degrades_and_still_counts() {
        let service = ScriptedService::default()
            .with_extract(Ok(Value::String("I could not find any intents".into())));
        let mut state = state();

        ExtractIntent.run(&mut state, &service).await.unwrap();

        assert!(state.intent_graph.degraded);
        assert!(state.intent_graph.intents.is_empty());
        assert_eq!(
            state.intent_graph.raw_response.as_deref(),
            Some("I could not find any intents")
        );
        assert_eq!(state.iteration_count, 1);
    }

    #[tokio::test]
    async fn test_graph_with_bad_intent_shape_degrades() {
        // `intents` entries missing required fields fail the typed decode.
        let service = ScriptedService::default()
            .with_extract(Ok(json!({ "intents": [{"no_id": true}] })));
        let mut state = state();

        ExtractIntent.run(&mut state, &service).await.unwrap();

        assert!(state.intent_graph.degraded);
    }

    #[tokio::test]
    async fn test_capability_error_leaves_counter_alone() {
        let service =
            ScriptedService::default().with_extract(Err(CapabilityError::Timeout));
        let mut state = state();

        let result = ExtractIntent.run(&mut state, &service).await;

        assert!(result.is_err());
        assert_eq!(state.iteration_count, 0);
    }

    #[tokio::test]
    async fn test_retry_overwrites_previous_graph() {
        let service = ScriptedService::default();
        let mut state = state();
        state.intent_graph = IntentGraph::degraded("stale");

        ExtractIntent.run(&mut state, &service).await.unwrap();

        assert!(!state.intent_graph.degraded);
        assert!(state.intent_graph.raw_response.is_none());
    }
}
