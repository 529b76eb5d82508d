//! Error types for the compliance engine

use crate::types::AlertStatus;
use thiserror::Error;

/// Result type for compliance operations
pub type Result<T> = std::result::Result<T, Error>;

/// Compliance engine errors
///
/// The taxonomy distinguishes caller errors (`InvalidRequest`,
/// `NotFound`, `InvalidTransition`), which must not be retried, from
/// infrastructure faults (`StorageUnavailable`), which the caller may
/// retry with backoff. The core itself never retries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed or missing input (caller error)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Referenced alert or entry does not exist (caller error)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Alert state machine violation (caller error)
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition {
        /// Status committed at the time of application
        from: AlertStatus,
        /// Attempted next status
        to: AlertStatus,
    },

    /// Audit store unavailable (infrastructure fault, retriable by caller)
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
