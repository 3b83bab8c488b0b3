//! Conversion service - the boundary façade over the engine.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use crate::capability::IntentService;
use crate::engine::{EngineConfig, WorkflowEngine};
use crate::error::ConvertError;
use crate::state::{ConversionState, ConversionStatus};
use crate::telemetry::{ConversionEvent, ErrorEvent, NoopTelemetry, Telemetry};
use crate::types::{IntentGraph, ValidationReport};

/// Largest accepted retry budget.
pub const MAX_ITERATION_BOUND: u32 = 10;

const DEFAULT_MAX_ITERATIONS: u32 = 3;

// ============================================================================
// REQUEST / OUTCOME
// ============================================================================

/// One conversion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub source_code: String,
    pub source_language: String,
    pub target_language: String,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

impl ConversionRequest {
    pub fn new(
        source_code: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            source_code: source_code.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Terminal envelope handed back to API and CLI callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutcome {
    pub success: bool,
    pub generated_code: String,
    pub intent_graph: IntentGraph,
    pub validation: ValidationReport,
    pub iterations: u32,
    pub processing_time_seconds: f64,
    pub error_message: Option<String>,
}

impl ConversionOutcome {
    fn from_state(state: ConversionState, processing_time_seconds: f64) -> Self {
        Self {
            success: state.status == ConversionStatus::Success,
            generated_code: state.generated_code,
            intent_graph: state.intent_graph,
            validation: state.validation,
            iterations: state.iteration_count,
            processing_time_seconds,
            error_message: state.error_message,
        }
    }
}

// ============================================================================
// SERVICE
// ============================================================================

/// Façade that validates input, drives the engine and reports telemetry.
///
/// Cheap to share: the capability and the telemetry sink sit behind `Arc`s
/// and are safe for concurrent runs; each run owns its own state.
pub struct ConversionService {
    capability: Arc<dyn IntentService>,
    telemetry: Arc<dyn Telemetry>,
    engine: WorkflowEngine,
}

impl ConversionService {
    pub fn new(capability: Arc<dyn IntentService>) -> Self {
        Self {
            capability,
            telemetry: Arc::new(NoopTelemetry),
            engine: WorkflowEngine::new(),
        }
    }

    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Arc<dyn Telemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    #[must_use]
    pub fn with_engine_config(mut self, config: EngineConfig) -> Self {
        self.engine = WorkflowEngine::with_config(config);
        self
    }

    /// Run one conversion to a terminal outcome.
    ///
    /// Emits exactly one conversion telemetry event per engine run, plus an
    /// error event when the run failed.
    ///
    /// # Errors
    ///
    /// [`ConvertError::InvalidInput`] when the request is rejected before any
    /// stage executes. Once the engine starts, failures are folded into the
    /// returned outcome instead.
    #[instrument(
        skip(self, request),
        fields(source = %request.source_language, target = %request.target_language)
    )]
    pub async fn convert(
        &self,
        request: ConversionRequest,
    ) -> Result<ConversionOutcome, ConvertError> {
        validate_request(&request)?;

        let started = Instant::now();
        let state = ConversionState::new(
            request.source_code,
            request.source_language,
            request.target_language,
            request.max_iterations,
        );

        let state = self.engine.run(state, self.capability.as_ref()).await;
        let duration = started.elapsed().as_secs_f64();

        let event = ConversionEvent::new(&state.source_language, &state.target_language, state.status)
            .with_duration_seconds(duration)
            .with_iterations(state.iteration_count)
            .with_code_length(state.generated_code.len())
            .with_metadata(json!({
                "intent_count": state.intent_graph.intents.len(),
                "validation_passed": state.validation.valid,
            }));
        self.telemetry.record_conversion(&event);

        if state.status == ConversionStatus::Failed {
            let message = state
                .error_message
                .clone()
                .unwrap_or_else(|| "conversion failed".to_string());
            self.telemetry.record_error(
                &ErrorEvent::new("workflow_error", message).with_context(json!({
                    "source_language": state.source_language,
                    "target_language": state.target_language,
                })),
            );
        }

        Ok(ConversionOutcome::from_state(state, duration))
    }
}

fn validate_request(request: &ConversionRequest) -> Result<(), ConvertError> {
    if request.source_code.trim().is_empty() {
        return Err(ConvertError::InvalidInput(
            "source code cannot be empty".into(),
        ));
    }
    if request.max_iterations < 1 || request.max_iterations > MAX_ITERATION_BOUND {
        return Err(ConvertError::InvalidInput(format!(
            "max_iterations must be between 1 and {MAX_ITERATION_BOUND}"
        )));
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
