//! Conditional routing between validation and generation.

use crate::types::ValidationReport;

/// Routing decision after a validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Send the run back for another intent-extraction attempt.
    Retry,
    /// Move on to code generation.
    Proceed,
}

/// Decides whether a rejected validation earns another extraction attempt.
///
/// The policy is deliberately best-effort: once the iteration budget is
/// spent the run proceeds to generation even if validation never passed.
/// Producing an imperfect conversion beats producing nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryPolicy;

impl RetryPolicy {
    /// Pure decision over the latest report and the iteration budget.
    ///
    /// A report counts as invalid when it says so explicitly or carries any
    /// critical issue; warnings and infos never trigger a retry on their own.
    pub fn decide(report: &ValidationReport, iteration_count: u32, max_iterations: u32) -> Decision {
        let invalid = !report.valid || report.has_critical();

        if invalid && iteration_count < max_iterations {
            Decision::Retry
        } else {
            Decision::Proceed
        }
    }
}
