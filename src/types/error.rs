//! Error kinds surfaced by the tracker, the session and its
//! collaborators.

use thiserror::Error;

/// Every fallible operation in the crate returns this error.
///
/// [`NavError::InvalidFix`] is recoverable: the sample is dropped and
/// the prior tracker state is kept. The remaining kinds are surfaced to
/// the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    /// Empty or degenerate geometry, or no route loaded at all.
    #[error("invalid route: {0}")]
    InvalidRoute(String),

    /// NaN or out-of-range coordinate in a position sample.
    #[error("invalid fix: {0}")]
    InvalidFix(String),

    /// The position source failed permanently (permission, hardware).
    #[error("position source unavailable: {0}")]
    PositionSourceUnavailable(String),

    /// Upstream routing failed. Never retried here.
    #[error("route source unavailable: {0}")]
    RouteSourceUnavailable(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
