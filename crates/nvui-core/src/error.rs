#![forbid(unsafe_code)]

//! Recoverable error taxonomy.
//!
//! Every error here is localized to one event: it is reported through the
//! caller's error callback and processing continues with the next event.
//! There is no fatal class; conditions that cannot be represented degrade
//! to the safest lossy behavior instead of aborting a batch.

use thiserror::Error;

/// An error raised while applying a single UI event.
#[derive(Debug, Error)]
pub enum UiError {
    /// A batch element does not match its expected shape (wrong arity or
    /// parameter type).
    #[error("decode error: {0}")]
    Decode(String),

    /// An event references state that must exist but does not (a grid id,
    /// a highlight id, a command-line level) due to an upstream protocol
    /// violation.
    #[error("inconsistent state: {0}")]
    Inconsistency(String),

    /// A structurally valid event describes a capability the engine does
    /// not implement.
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

impl UiError {
    /// Build a decode error with a formatted context message.
    pub fn decode(message: impl Into<String>) -> Self {
        UiError::Decode(message.into())
    }

    /// Build an inconsistency error with a formatted context message.
    pub fn inconsistency(message: impl Into<String>) -> Self {
        UiError::Inconsistency(message.into())
    }

    /// Build an unsupported-operation error with a formatted context message.
    pub fn unsupported(message: impl Into<String>) -> Self {
        UiError::Unsupported(message.into())
    }
}
