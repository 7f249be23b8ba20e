//! Pipeline errors and non-fatal error collection.

use super::error_code::{self, LeadErrorCode};
use super::{CollaboratorError, ConfigError, InputError, PatternError, ProfileError};

/// Errors that can occur while running the scoring pipeline.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Malformed input: {0}")]
    Input(#[from] InputError),

    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Collaborator error: {0}")]
    Source(#[from] CollaboratorError),

    #[error("Unknown scoring profile: {0}")]
    UnknownProfile(String),

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(String),
}

impl LeadErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Input(e) => e.error_code(),
            Self::Pattern(e) => e.error_code(),
            Self::Profile(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Source(e) => e.error_code(),
            Self::UnknownProfile(_) => error_code::UNKNOWN_PROFILE,
            Self::WorkerPool(_) => error_code::WORKER_POOL_ERROR,
        }
    }
}

/// Result of a pipeline run that accumulates non-fatal errors.
/// Allows partial results to be returned even when some items fail.
#[derive(Debug, Default)]
pub struct PipelineResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal errors collected during the run.
    pub errors: Vec<PipelineError>,
}

impl<T: Default> PipelineResult<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: PipelineError) {
        self.errors.push(error);
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
