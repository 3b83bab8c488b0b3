//! Shared data types for conversion runs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// IDENTIFIERS
// ============================================================================

/// Unique identifier for a conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversionId(String);

impl ConversionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(format!("conv-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// INTENT GRAPH
// ============================================================================

/// Category tag for a single extracted intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    DataLoading,
    Transformation,
    Aggregation,
    Filtering,
    Visualization,
    /// Anything the capability tags outside the known categories.
    #[serde(other)]
    Other,
}

impl Default for IntentKind {
    fn default() -> Self {
        Self::Other
    }
}

/// A single language-agnostic developer goal.
///
/// An intent describes WHAT the original code achieves ("group rows by
/// category and average a column"), decoupled from how the source language
/// spelled it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    /// Unique within one graph.
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: IntentKind,
    pub description: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, serde_json::Value>,
    /// Ids of intents whose output this one consumes.
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// The full set of intents for one conversion plus dependency edges and an
/// overall-goal summary.
///
/// Overwritten wholesale by every extraction attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntentGraph {
    #[serde(default)]
    pub intents: Vec<Intent>,
    /// Forward data-flow edges, intent id → consumers.
    #[serde(default)]
    pub data_flow: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub overall_goal: String,
    /// Set when the capability output could not be decoded and this graph is
    /// a structurally valid placeholder.
    #[serde(default, skip_serializing_if = "is_false")]
    pub degraded: bool,
    /// Raw capability text kept for inspection when `degraded` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl IntentGraph {
    /// Placeholder graph used when the capability response cannot be decoded.
    pub fn degraded(raw: impl Into<String>) -> Self {
        Self {
            degraded: true,
            raw_response: Some(raw.into()),
            ..Self::default()
        }
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Severity attached to a validation issue.
///
/// Only `Critical` participates in retry routing; the rest are advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// One problem reported by the validation stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub suggestion: String,
}

/// Outcome of one validation pass over an intent graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub assessment: String,
    /// Set when the capability review could not be decoded and this report is
    /// a pass-through placeholder.
    #[serde(default, skip_serializing_if = "is_false")]
    pub degraded: bool,
}

impl ValidationReport {
    /// Pass-through report used when the capability review cannot be decoded.
    ///
    /// Deliberately `valid = true`: an uninterpretable review must not park
    /// the pipeline in the retry loop.
    pub fn degraded() -> Self {
        Self {
            valid: true,
            issues: Vec::new(),
            assessment: "validation response could not be interpreted".to_string(),
            degraded: true,
        }
    }

    /// True when any reported issue is critical.
    pub fn has_critical(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity == Severity::Critical)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

// ============================================================================
// TESTS
// ============================================================================
