//! Pattern library errors. Fatal at load time.

use super::error_code::{self, LeadErrorCode};

/// Errors raised while loading or compiling a pattern library.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("failed to read pattern library {path}: {message}")]
    Io { path: String, message: String },

    #[error("pattern library parse error: {0}")]
    Parse(String),

    #[error("regex error in rule '{rule}' of set '{set}': {message}")]
    Compilation {
        set: String,
        rule: String,
        message: String,
    },

    #[error("rule '{rule}' of set '{set}' matches the empty string")]
    EmptyMatch { set: String, rule: String },

    #[error("invalid rule '{rule}' in set '{set}': {message}")]
    InvalidRule {
        set: String,
        rule: String,
        message: String,
    },

    #[error("pattern set '{0}' is defined more than once")]
    DuplicateSet(String),

    #[error("invalid cap for set '{set}': {cap}")]
    InvalidCap { set: String, cap: f64 },
}

impl LeadErrorCode for PatternError {
    fn error_code(&self) -> &'static str {
        error_code::PATTERN_ERROR
    }
}
