//! Telemetry contract and built-in sinks.
//!
//! The core reports run outcomes through an explicitly injected collaborator
//! instead of a process-global logger, so embedders choose the sink and
//! tests can swap in a recorder. Sinks are fire-and-forget: they must never
//! block a conversion and must swallow their own failures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::state::ConversionStatus;

// ============================================================================
// EVENTS
// ============================================================================

/// Summary of one finished conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionEvent {
    pub source_language: String,
    pub target_language: String,
    pub status: ConversionStatus,
    pub duration_seconds: f64,
    pub iterations: u32,
    pub code_length: usize,
    pub timestamp: DateTime<Utc>,
    /// Additional structured data (intent count, validation outcome, ...).
    #[serde(default)]
    pub metadata: Value,
}

impl ConversionEvent {
    /// Create an event stamped with the current time.
    pub fn new(
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        status: ConversionStatus,
    ) -> Self {
        Self {
            source_language: source_language.into(),
            target_language: target_language.into(),
            status,
            duration_seconds: 0.0,
            iterations: 0,
            code_length: 0,
            timestamp: Utc::now(),
            metadata: Value::Null,
        }
    }

    #[must_use]
    pub fn with_duration_seconds(mut self, duration_seconds: f64) -> Self {
        self.duration_seconds = duration_seconds;
        self
    }

    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    #[must_use]
    pub fn with_code_length(mut self, code_length: usize) -> Self {
        self.code_length = code_length;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A reportable failure with free-form context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub error_kind: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub context: Value,
}

impl ErrorEvent {
    pub fn new(error_kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_kind: error_kind.into(),
            message: message.into(),
            timestamp: Utc::now(),
            context: Value::Null,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }
}

// ============================================================================
// SINKS
// ============================================================================

/// Sink for conversion telemetry.
pub trait Telemetry: Send + Sync {
    /// Record one finished run.
    fn record_conversion(&self, event: &ConversionEvent);

    /// Record a failure.
    fn record_error(&self, event: &ErrorEvent);
}

/// Discards every event. The default for embedding and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {
    fn record_conversion(&self, _event: &ConversionEvent) {}
    fn record_error(&self, _event: &ErrorEvent) {}
}

/// Emits events as structured `tracing` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTelemetry;

impl Telemetry for LogTelemetry {
    fn record_conversion(&self, event: &ConversionEvent) {
        info!(
            source = %event.source_language,
            target = %event.target_language,
            status = %event.status,
            duration_seconds = event.duration_seconds,
            iterations = event.iterations,
            code_length = event.code_length,
            "conversion recorded"
        );
    }

    fn record_error(&self, event: &ErrorEvent) {
        error!(
            kind = %event.error_kind,
            message = %event.message,
            "conversion error recorded"
        );
    }
}
