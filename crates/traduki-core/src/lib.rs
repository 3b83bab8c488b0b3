//! # traduki-core
//!
//! Staged, LLM-driven code conversion: structural parse → intent extraction
//! → validation → idiomatic generation, sequenced by a small state machine
//! with a bounded validate/extract retry loop.
//!
//! This crate is the orchestration core only. The text-generation capability
//! behind the stages is the [`IntentService`] trait (implemented elsewhere,
//! e.g. by the `traduki-llm` crate), and run outcomes are reported through an
//! injected [`Telemetry`] collaborator.
//!
//! # Pipeline
//!
//! ```text
//!  Parse ──▶ ExtractIntent ──▶ Validate ──▶ Generate ──▶ Done
//!                 ▲                │
//!                 └──── retry ─────┘  (bounded by max_iterations)
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use traduki_core::{ConversionRequest, ConversionService};
//!
//! let service = ConversionService::new(Arc::new(capability));
//! let outcome = service
//!     .convert(ConversionRequest::new(code, "R", "Python"))
//!     .await?;
//! assert!(outcome.success);
//! ```

pub mod capability;
pub mod engine;
pub mod error;
pub mod policy;
pub mod sanitize;
pub mod service;
pub mod stages;
pub mod state;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use capability::IntentService;
pub use engine::{EngineConfig, WorkflowEngine};
pub use error::{CapabilityError, ConvertError};
pub use policy::{Decision, RetryPolicy};
pub use sanitize::strip_code_fence;
pub use service::{ConversionOutcome, ConversionRequest, ConversionService, MAX_ITERATION_BOUND};
pub use state::{ConversionState, ConversionStatus};
pub use telemetry::{ConversionEvent, ErrorEvent, LogTelemetry, NoopTelemetry, Telemetry};
pub use types::{
    ConversionId, Intent, IntentGraph, IntentKind, Issue, Severity, ValidationReport,
};
