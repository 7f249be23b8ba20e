//! Structured span field names.
//!
//! Standard field names used in tracing spans and events across the
//! engine, so batch logs can be queried consistently.

/// Pipeline: items in the incoming batch.
pub const BATCH_SIZE: &str = "batch_size";

/// Pipeline: scoring profile in use.
pub const PROFILE: &str = "profile";

/// Pipeline: items that reached full scoring.
pub const SCORED_COUNT: &str = "scored_count";

/// Pipeline: items skipped as malformed.
pub const INVALID_COUNT: &str = "invalid_count";

/// Pipeline: items rejected by the pre-filter.
pub const REJECTED_COUNT: &str = "rejected_count";

/// Pipeline: duplicates dropped by fingerprint.
pub const DUPLICATE_COUNT: &str = "duplicate_count";

/// Pipeline: advisor posts short-circuited.
pub const FILTERED_COUNT: &str = "filtered_count";

/// Pipeline: qualified leads in the ranked output.
pub const QUALIFIED_COUNT: &str = "qualified_count";

/// Pipeline: wall time of a run in milliseconds.
pub const RUN_DURATION_MS: &str = "run_duration_ms";

/// Patterns: dimension sets loaded into a library.
pub const PATTERN_SET_COUNT: &str = "pattern_set_count";

/// Patterns: profiles loaded into a library.
pub const PROFILE_COUNT: &str = "profile_count";
