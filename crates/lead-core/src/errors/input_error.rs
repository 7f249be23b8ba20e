//! Malformed input errors. Non-fatal: the offending item is skipped.

use serde::{Deserialize, Serialize};

use super::error_code::{self, LeadErrorCode};

/// A content item that cannot be scored at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum InputError {
    #[error("item has an empty id")]
    MissingId,

    #[error("item {id} has no author")]
    MissingAuthor { id: String },

    #[error("item {id} has neither title nor body")]
    MissingText { id: String },
}

impl InputError {
    /// Id of the offending item, when it has one.
    pub fn item_id(&self) -> Option<&str> {
        match self {
            Self::MissingId => None,
            Self::MissingAuthor { id } | Self::MissingText { id } => Some(id),
        }
    }
}

impl LeadErrorCode for InputError {
    fn error_code(&self) -> &'static str {
        error_code::MALFORMED_INPUT
    }
}
