//! Error types for the conversion core.

use thiserror::Error;

/// Errors raised by the opaque intent-generation capability.
///
/// These are the unrecoverable kind: a stage that receives one aborts the
/// run. Malformed-but-delivered payloads are not errors at this level; the
/// stages absorb those as degraded results.
#[derive(Debug, Clone, Error)]
pub enum CapabilityError {
    /// The capability is unreachable or returned a hard failure.
    #[error("capability unavailable: {0}")]
    Unavailable(String),

    /// The capability call exceeded the caller-imposed bound.
    #[error("capability call timed out")]
    Timeout,
}

/// Errors surfaced at the conversion service boundary.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Request rejected before any stage executed.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
