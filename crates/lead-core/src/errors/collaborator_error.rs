//! Errors reported by external collaborators (content source, CRM sink).

use super::error_code::{self, LeadErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("content source failed: {0}")]
    Source(String),

    #[error("lead sink failed: {0}")]
    Sink(String),

    #[error("lead {0} not found")]
    NotFound(String),

    #[error("lead {0} is already saved")]
    AlreadySaved(String),
}

impl LeadErrorCode for CollaboratorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Source(_) => error_code::SOURCE_ERROR,
            Self::Sink(_) | Self::NotFound(_) | Self::AlreadySaved(_) => error_code::SINK_ERROR,
        }
    }
}
