//! Workflow engine - drives one conversion through the stage graph.
//!
//! The graph is fixed:
//!
//! ```text
//!  Parse ──▶ ExtractIntent ──▶ Validate ──▶ Generate ──▶ Done
//!                 ▲                │
//!                 └──── retry ─────┘
//! ```
//!
//! The only conditional transition is the one out of Validate, governed by
//! [`RetryPolicy`]; every other edge is direct. Encoding the graph as an
//! enumerated node type with a total transition function keeps the bounded
//! retry loop a structural property rather than scattered branching.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::capability::IntentService;
use crate::error::CapabilityError;
use crate::policy::{Decision, RetryPolicy};
use crate::stages::{ExtractIntent, Generate, Parse, Stage, Validate};
use crate::state::ConversionState;
use crate::types::ConversionId;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound applied uniformly to every stage invocation. A stage that
    /// exceeds it fails the run with a timeout, never a partial success.
    pub stage_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stage_timeout: Duration::from_secs(60),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = timeout;
        self
    }
}

// ============================================================================
// STATE MACHINE
// ============================================================================

/// Nodes of the conversion state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineNode {
    Parse,
    ExtractIntent,
    Validate,
    Generate,
    Done,
}

impl EngineNode {
    /// Transition table. The Validate exit is the single conditional edge.
    fn next(self, state: &ConversionState) -> EngineNode {
        match self {
            EngineNode::Parse => EngineNode::ExtractIntent,
            EngineNode::ExtractIntent => EngineNode::Validate,
            EngineNode::Validate => match RetryPolicy::decide(
                &state.validation,
                state.iteration_count,
                state.max_iterations,
            ) {
                Decision::Retry => EngineNode::ExtractIntent,
                Decision::Proceed => EngineNode::Generate,
            },
            EngineNode::Generate => EngineNode::Done,
            EngineNode::Done => EngineNode::Done,
        }
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Sequences the pipeline stages for one conversion run.
pub struct WorkflowEngine {
    config: EngineConfig,
    parse: Parse,
    extract: ExtractIntent,
    validate: Validate,
    generate: Generate,
}

impl WorkflowEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            parse: Parse,
            extract: ExtractIntent,
            validate: Validate,
            generate: Generate,
        }
    }

    /// Run the pipeline to a terminal state.
    ///
    /// Always returns the state. A stage failure is folded into it as
    /// `status = Failed` plus an error message; callers check the status
    /// rather than catching anything.
    pub async fn run(
        &self,
        mut state: ConversionState,
        service: &dyn IntentService,
    ) -> ConversionState {
        let run_id = ConversionId::generate();
        info!(
            run_id = %run_id,
            source = %state.source_language,
            target = %state.target_language,
            max_iterations = state.max_iterations,
            "conversion run started"
        );

        let mut node = EngineNode::Parse;
        while let Some(stage) = self.stage(node) {
            if let Err(err) = self.run_stage(stage, &mut state, service).await {
                warn!(run_id = %run_id, stage = stage.name(), %err, "stage aborted the run");
                state.mark_failed(format!("{} stage failed: {err}", stage.name()));
                return state;
            }

            node = node.next(&state);
            debug!(
                run_id = %run_id,
                next = ?node,
                iteration = state.iteration_count,
                "transition"
            );
        }

        info!(
            run_id = %run_id,
            status = %state.status,
            iterations = state.iteration_count,
            "conversion run finished"
        );
        state
    }

    /// Map a node onto its stage. `Done` has none, which ends the drive loop.
    fn stage(&self, node: EngineNode) -> Option<&dyn Stage> {
        match node {
            EngineNode::Parse => Some(&self.parse),
            EngineNode::ExtractIntent => Some(&self.extract),
            EngineNode::Validate => Some(&self.validate),
            EngineNode::Generate => Some(&self.generate),
            EngineNode::Done => None,
        }
    }

    /// Invoke one stage under the uniform timeout.
    async fn run_stage(
        &self,
        stage: &dyn Stage,
        state: &mut ConversionState,
        service: &dyn IntentService,
    ) -> Result<(), CapabilityError> {
        match tokio::time::timeout(self.config.stage_timeout, stage.run(state, service)).await {
            Ok(result) => result,
            Err(_) => Err(CapabilityError::Timeout),
        }
    }
}

impl Default for WorkflowEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
