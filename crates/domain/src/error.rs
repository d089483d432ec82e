//! Domain validation errors.
//!
//! Returned when a name, loot range or monster descriptor breaks one of its
//! invariants, so adapters don't have to fall back to String errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value broke an invariant (empty name, inverted range, ...).
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    /// Creates a validation error for a violated invariant.
    ///
    /// # Example
    /// ```ignore
    /// if min > max {
    ///     return Err(DomainError::validation("Loot range minimum exceeds maximum"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
