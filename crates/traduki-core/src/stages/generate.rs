//! Code generation stage.

use async_trait::async_trait;
use tracing::debug;

use super::Stage;
use crate::capability::IntentService;
use crate::error::CapabilityError;
use crate::sanitize::strip_code_fence;
use crate::state::ConversionState;

/// Terminal stage: emit idiomatic code in the target language.
///
/// The only stage permitted to mark the run successful.
#[derive(Debug, Clone, Copy, Default)]
pub struct Generate;

#[async_trait]
impl Stage for Generate {
    fn name(&self) -> &'static str {
        "generate"
    }

    async fn run(
        &self,
        state: &mut ConversionState,
        service: &dyn IntentService,
    ) -> Result<(), CapabilityError> {
        let raw = service
            .generate(
                &state.intent_graph,
                &state.source_code,
                &state.source_language,
                &state.target_language,
            )
            .await?;

        state.generated_code = strip_code_fence(&raw);
        state.mark_success();

        debug!(code_length = state.generated_code.len(), "generation complete");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ConversionStatus;
    use crate::testing::ScriptedService;

    fn state() -> ConversionState {
        ConversionState::new("x <- 1:10\nprint(sum(x))", "R", "Python", 3)
    }

    #[tokio::test]
    async fn test_generation_sets_success() {
        let service = ScriptedService::default();
        let mut state = state();

        Generate.run(&mut state, &service).await.unwrap();

        assert_eq!(state.status, ConversionStatus::Success);
        assert!(!state.generated_code.is_empty());
    }

    #[tokio::test]
    async fn test_fenced_output_is_sanitized() {
        let service = ScriptedService::default()
            .with_generate(Ok("```python\nprint(sum(range(1, 11)))\n```".into()));
        let mut state = state();

        Generate.run(&mut state, &service).await.unwrap();

        assert_eq!(state.generated_code, "print(sum(range(1, 11)))");
    }

    #[tokio::test]
    async fn test_capability_error_leaves_run_in_progress() {
        let service = ScriptedService::default()
            .with_generate(Err(CapabilityError::Unavailable("model overloaded".into())));
        let mut state = state();

        let result = Generate.run(&mut state, &service).await;

        assert!(result.is_err());
        assert_eq!(state.status, ConversionStatus::InProgress);
        assert!(state.generated_code.is_empty());
    }
}
