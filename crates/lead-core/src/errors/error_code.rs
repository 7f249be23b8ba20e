//! LeadErrorCode trait for structured error reporting.

/// Every error enum implements this to expose a stable code string
/// that downstream consumers (dashboards, logs) can match on.
pub trait LeadErrorCode {
    /// Returns the error code string (e.g., "PATTERN_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const MALFORMED_INPUT: &str = "MALFORMED_INPUT";
pub const PATTERN_ERROR: &str = "PATTERN_ERROR";
pub const PROFILE_ERROR: &str = "PROFILE_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const UNKNOWN_PROFILE: &str = "UNKNOWN_PROFILE";
pub const SOURCE_ERROR: &str = "SOURCE_ERROR";
pub const SINK_ERROR: &str = "SINK_ERROR";
pub const WORKER_POOL_ERROR: &str = "WORKER_POOL_ERROR";
