//! Error types shared by the calculators and the recommendation gateway

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors a calculator submission can end with
///
/// Nothing here is fatal: every variant is recoverable by fixing the form
/// and submitting again.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculatorError {
    /// A form field failed parsing or range checks
    #[error("Invalid input: {}", .0.user_message())]
    InvalidInput(ValidationError),

    /// A value the calculator depends on is neither in the profile nor entered manually
    #[error("Missing prerequisite: {field} (run the {producer} calculator or enter it manually)")]
    MissingPrerequisite {
        field: &'static str,
        producer: &'static str,
    },
}

impl From<ValidationError> for CalculatorError {
    fn from(err: ValidationError) -> Self {
        CalculatorError::InvalidInput(err)
    }
}

/// Recommendation gateway errors
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The snapshot is missing a required metric or holds an invalid one
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// The AI upstream is switched off in configuration
    #[error("Recommendation service is disabled")]
    Disabled,

    /// The upstream call failed or returned something unusable
    #[error("Upstream error: {0}")]
    Upstream(String),
}
