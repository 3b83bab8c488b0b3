//! Scripted collaborators shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::capability::IntentService;
use crate::error::CapabilityError;
use crate::telemetry::{ConversionEvent, ErrorEvent, Telemetry};
use crate::types::IntentGraph;

pub(crate) fn parse_payload() -> Value {
    json!({
        "variables": ["x"],
        "data_structures": ["vector"],
        "operations": [{"type": "aggregation", "details": "sum of x"}],
        "libraries": [],
        "inputs": [],
        "outputs": ["printed sum"],
    })
}

pub(crate) fn graph_payload() -> Value {
    json!({
        "intents": [{
            "id": "intent_1",
            "type": "aggregation",
            "description": "Sum a numeric sequence and print the result",
            "parameters": {},
            "depends_on": [],
        }],
        "data_flow": {},
        "overall_goal": "Print the sum of a numeric sequence",
    })
}

pub(crate) fn valid_report() -> Value {
    json!({"valid": true, "issues": [], "assessment": "complete"})
}

pub(crate) fn critical_report() -> Value {
    json!({
        "valid": false,
        "issues": [{
            "type": "missing_operation",
            "severity": "critical",
            "description": "the print step is not captured",
            "suggestion": "add an output intent",
        }],
        "assessment": "incomplete",
    })
}

/// Capability stub with scripted per-call responses.
///
/// The validation script is consumed one entry per call; the last entry
/// repeats once the script runs out, which makes "always rejects" a
/// one-entry script.
pub(crate) struct ScriptedService {
    parse: Result<Value, CapabilityError>,
    extract: Result<Value, CapabilityError>,
    validate: Vec<Result<Value, CapabilityError>>,
    generate: Result<String, CapabilityError>,
    latency: Duration,
    validate_calls: AtomicUsize,
    pub(crate) extract_calls: AtomicUsize,
}

impl Default for ScriptedService {
    fn default() -> Self {
        Self {
            parse: Ok(parse_payload()),
            extract: Ok(graph_payload()),
            validate: vec![Ok(valid_report())],
            generate: Ok("print(sum(range(1, 11)))".to_string()),
            latency: Duration::ZERO,
            validate_calls: AtomicUsize::new(0),
            extract_calls: AtomicUsize::new(0),
        }
    }
}

impl ScriptedService {
    pub(crate) fn with_parse(mut self, response: Result<Value, CapabilityError>) -> Self {
        self.parse = response;
        self
    }

    pub(crate) fn with_extract(mut self, response: Result<Value, CapabilityError>) -> Self {
        self.extract = response;
        self
    }

    pub(crate) fn with_validate(
        mut self,
        script: Vec<Result<Value, CapabilityError>>,
    ) -> Self {
        assert!(!script.is_empty(), "validation script must not be empty");
        self.validate = script;
        self
    }

    pub(crate) fn with_generate(mut self, response: Result<String, CapabilityError>) -> Self {
        self.generate = response;
        self
    }

    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl IntentService for ScriptedService {
    async fn structural_parse(
        &self,
        _code: &str,
        _language: &str,
    ) -> Result<Value, CapabilityError> {
        self.delay().await;
        self.parse.clone()
    }

    async fn extract_intent(
        &self,
        _parsed: &Value,
        _code: &str,
        _language: &str,
    ) -> Result<Value, CapabilityError> {
        self.delay().await;
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        self.extract.clone()
    }

    async fn validate(
        &self,
        _graph: &IntentGraph,
        _parsed: &Value,
        _code: &str,
    ) -> Result<Value, CapabilityError> {
        self.delay().await;
        let call = self.validate_calls.fetch_add(1, Ordering::SeqCst);
        let index = call.min(self.validate.len() - 1);
        self.validate[index].clone()
    }

    async fn generate(
        &self,
        _graph: &IntentGraph,
        _code: &str,
        _source_language: &str,
        _target_language: &str,
    ) -> Result<String, CapabilityError> {
        self.delay().await;
        self.generate.clone()
    }
}

/// Telemetry sink that records every event for assertions.
#[derive(Default)]
pub(crate) struct RecordingTelemetry {
    pub(crate) conversions: Mutex<Vec<ConversionEvent>>,
    pub(crate) errors: Mutex<Vec<ErrorEvent>>,
}

impl Telemetry for RecordingTelemetry {
    fn record_conversion(&self, event: &ConversionEvent) {
        self.conversions.lock().unwrap().push(event.clone());
    }

    fn record_error(&self, event: &ErrorEvent) {
        self.errors.lock().unwrap().push(event.clone());
    }
}
