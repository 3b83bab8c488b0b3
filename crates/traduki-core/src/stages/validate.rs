//! Intent validation stage.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::Stage;
use crate::capability::IntentService;
use crate::error::CapabilityError;
use crate::state::ConversionState;
use crate::types::ValidationReport;

/// Third stage: quality review of the extracted intent graph.
///
/// Pure check: writes `validation` and mutates nothing else. A review the
/// stage cannot decode falls back to a pass-through report tagged
/// `degraded`, so a provider that drifts off the response format never traps
/// the run in the retry loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validate;

#[async_trait]
impl Stage for Validate {
    fn name(&self) -> &'static str {
        "validate"
    }

    async fn run(
        &self,
        state: &mut ConversionState,
        service: &dyn IntentService,
    ) -> Result<(), CapabilityError> {
        let payload = service
            .validate(
                &state.intent_graph,
                &state.parsed_structure,
                &state.source_code,
            )
            .await?;

        state.validation = decode_report(payload);

        debug!(
            valid = state.validation.valid,
            issues = state.validation.issues.len(),
            degraded = state.validation.degraded,
            "validation updated"
        );

        Ok(())
    }
}

fn decode_report(payload: Value) -> ValidationReport {
    match serde_json::from_value::<ValidationReport>(payload) {
        Ok(report) => report,
        Err(err) => {
            warn!(%err, "validation payload did not decode, assuming pass-through");
            ValidationReport::degraded()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{critical_report, ScriptedService};
    use serde_json::json;

    fn state() -> ConversionState {
        ConversionState::new("x <- 1:10\nprint(sum(x))", "R", "Python", 3)
    }

    #[tokio::test]
    async fn test_valid_report_is_stored() {
        let service = ScriptedService::default();
        let mut state = state();

        Validate.run(&mut state, &service).await.unwrap();

        assert!(state.validation.valid);
        assert!(state.validation.issues.is_empty());
        assert!(!state.validation.degraded);
    }

    #[tokio::test]
    async fn test_critical_report_is_stored() {
        let service = ScriptedService::default().with_validate(vec![Ok(critical_report())]);
        let mut state = state();

        Validate.run(&mut state, &service).await.unwrap();

        assert!(!state.validation.valid);
        assert!(state.validation.has_critical());
    }

    #[tokio::test]
    async fn test_malformed_review_degrades_to_pass_through() {
        let service = ScriptedService::default()
            .with_validate(vec![Ok(Value::String("looks fine to me".into()))]);
        let mut state = state();

        Validate.run(&mut state, &service).await.unwrap();

        assert!(state.validation.valid);
        assert!(state.validation.degraded);
        assert!(state.validation.issues.is_empty());
    }

    #[tokio::test]
    async fn test_review_without_valid_field_degrades() {
        let service =
            ScriptedService::default().with_validate(vec![Ok(json!({"issues": []}))]);
        let mut state = state();

        Validate.run(&mut state, &service).await.unwrap();

        assert!(state.validation.degraded);
    }

    #[tokio::test]
    async fn test_counter_is_not_touched() {
        let service = ScriptedService::default();
        let mut state = state();
        state.iteration_count = 2;

        Validate.run(&mut state, &service).await.unwrap();

        assert_eq!(state.iteration_count, 2);
    }

    #[tokio::test]
    async fn test_capability_error_propagates() {
        let service = ScriptedService::default()
            .with_validate(vec![Err(CapabilityError::Unavailable("503".into()))]);
        let mut state = state();

        assert!(Validate.run(&mut state, &service).await.is_err());
    }
}
