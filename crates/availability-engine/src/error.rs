//! Error types for availability-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("Invalid time '{0}': expected HH:MM (24-hour)")]
    InvalidTime(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),

    /// The structured response from the language model failed validation.
    /// Holds every problem found, not just the first.
    #[error("Invalid response structure: {}", .0.join(", "))]
    InvalidIntake(Vec<String>),

    #[error("Invalid analysis type: {0}")]
    InvalidAnalysisKind(String),

    #[error("{0}")]
    InvalidContact(String),

    #[error("Missing onboarding ID. Please complete the initial onboarding step first.")]
    MissingOnboardingId,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AvailabilityError>;
