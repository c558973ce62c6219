//! Gesture error types
//!
//! Every error here is a caller-input error. Nothing is retried.

use thiserror::Error;

/// Errors surfaced by history views, drag data and the registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GestureError {
    #[error("Index {index} out of range for history of length {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("Drag listener already registered under key: {0}")]
    DuplicateKey(String),

    #[error("No drag listener registered under key: {0}")]
    UnknownKey(String),

    #[error("Entity is not tracked by this gesture: {0}")]
    UnknownEntity(String),
}

/// Result type for gesture operations
pub type GestureResult<T> = Result<T, GestureError>;
