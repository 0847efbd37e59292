//! Core error types.

use thiserror::Error;

/// Top-level error type for game operations.
#[derive(Debug, Error)]
pub enum GameError {
    /// A referenced session, statement set, or presentation does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Input rejected by the caller-facing validation layer.
    #[error("validation error: {0}")]
    Validation(String),

    /// The backing table store failed or is unreachable.
    #[error("store error: {0}")]
    Store(String),
}
