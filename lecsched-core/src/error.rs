//! Error types for lecsched.

use thiserror::Error;

/// Errors raised while validating schedules or loading reference data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// Malformed or incomplete payload. The caller must fix it and resubmit.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced data is absent (e.g. a period number the table doesn't know).
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// Reference data could not be loaded.
    #[error("Data error: {0}")]
    Data(String),
}

impl ScheduleError {
    pub fn missing_field(path: &str) -> Self {
        ScheduleError::Validation(format!("missing required field `{}`", path))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ScheduleError::Validation(_))
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self, ScheduleError::Lookup(_))
    }
}

/// Result type alias for schedule operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// A call to the external calendar service failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Authorization failed: {0}")]
    Auth(String),

    #[error("Calendar request failed: {0}")]
    Request(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}
