//! Scoring profile errors. Fatal at load time.

use super::error_code::{self, LeadErrorCode};

/// A scoring profile that does not agree with its pattern library.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("profile '{profile}' uses dimension '{dimension}' but gives it no weight")]
    MissingWeight { profile: String, dimension: String },

    #[error("profile '{profile}' references unknown dimension '{dimension}'")]
    UnknownDimension { profile: String, dimension: String },

    #[error("profile '{profile}' lists '{dimension}' as a penalty but it is not a penalty set")]
    NotAPenalty { profile: String, dimension: String },

    #[error("profile '{profile}' has invalid {field}: {message}")]
    InvalidValue {
        profile: String,
        field: String,
        message: String,
    },

    #[error("profile '{0}' is defined more than once")]
    Duplicate(String),

    #[error("default profile '{0}' is not defined")]
    MissingDefault(String),
}

impl LeadErrorCode for ProfileError {
    fn error_code(&self) -> &'static str {
        error_code::PROFILE_ERROR
    }
}
