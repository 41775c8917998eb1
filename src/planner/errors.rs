//! Predicate parse errors

use thiserror::Error;

/// Result type for predicate parsing
pub type PlannerResult<T> = Result<T, PlannerError>;

/// A condition string that does not follow the predicate grammar.
///
/// `position` is the byte offset in the input where parsing stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {position}")]
pub struct PlannerError {
    message: String,
    position: usize,
}

impl PlannerError {
    /// Creates a parse error at an input offset
    pub fn malformed(position: usize, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        "FLAT_MALFORMED_PREDICATE"
    }

    /// Returns the error message without position
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte offset of the failure
    pub fn position(&self) -> usize {
        self.position
    }
}
