//! Structured error types for the Physalia ecosystem.

use thiserror::Error;

/// Unified error type for all Physalia operations.
#[derive(Debug, Error)]
pub enum PhysaliaError {
    /// A sequence shorter than the minimum required by the model order.
    #[error("sequence of length {actual} is shorter than the required minimum {required}")]
    InsufficientSequenceLength {
        /// Minimum length the operation requires.
        required: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// A state not present in the declared state roster.
    #[error("unknown state: {0}")]
    UnknownState(String),

    /// Invalid input (bad arguments, mismatched dimensions)
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience alias used throughout the Physalia ecosystem.
pub type Result<T> = std::result::Result<T, PhysaliaError>;
