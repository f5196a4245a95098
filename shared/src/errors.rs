//! Error types for the Calorie Tracker domain

use thiserror::Error;

/// Errors raised by the plan calculator
///
/// Input validation is the only failure mode: no partial plan is ever
/// returned alongside an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PlanError {
    pub fn invalid(message: impl Into<String>) -> Self {
        PlanError::InvalidInput(message.into())
    }

    /// The human-readable message without the error prefix
    pub fn message(&self) -> &str {
        match self {
            PlanError::InvalidInput(msg) => msg,
        }
    }
}

pub type PlanResult<T> = Result<T, PlanError>;
