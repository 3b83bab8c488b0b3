//! Conversion state threaded through the pipeline stages.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::types::{IntentGraph, ValidationReport};

/// Lifecycle status of a conversion run.
///
/// Monotonic: once a run leaves `InProgress` it never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStatus {
    InProgress,
    Success,
    Failed,
}

impl ConversionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The record threaded through all pipeline stages for one run.
///
/// Owned exclusively by the engine for the duration of the run and never
/// shared across concurrent conversions, so no synchronization is needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionState {
    // Immutable inputs, set once at creation.
    pub source_code: String,
    pub source_language: String,
    pub target_language: String,

    /// Opaque structural analysis from the parse stage (`Null` until then).
    pub parsed_structure: Value,
    /// Overwritten by every extraction attempt.
    pub intent_graph: IntentGraph,
    /// Always the result of the most recent validation pass.
    pub validation: ValidationReport,
    /// Empty until generation completes.
    pub generated_code: String,

    /// Incremented exactly once per intent-extraction attempt.
    pub iteration_count: u32,
    /// Immutable retry budget, at least 1.
    pub max_iterations: u32,
    pub status: ConversionStatus,
    pub error_message: Option<String>,
}

impl ConversionState {
    /// Create the initial state for a run.
    pub fn new(
        source_code: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        max_iterations: u32,
    ) -> Self {
        Self {
            source_code: source_code.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            parsed_structure: Value::Null,
            intent_graph: IntentGraph::default(),
            validation: ValidationReport::default(),
            generated_code: String::new(),
            iteration_count: 0,
            max_iterations,
            status: ConversionStatus::InProgress,
            error_message: None,
        }
    }

    /// Mark the run failed. A run that already reached a terminal status is
    /// left untouched.
    pub fn mark_failed(&mut self, message: impl Into<String>) {
        if self.status == ConversionStatus::InProgress {
            self.status = ConversionStatus::Failed;
            self.error_message = Some(message.into());
        }
    }

    /// Mark the run successful. Only the generation stage calls this.
    pub(crate) fn mark_success(&mut self) {
        if self.status == ConversionStatus::InProgress {
            self.status = ConversionStatus::Success;
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
