//! Shared constants for the lead scoring engine.

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Minimum normalized text length (chars) for an item to be scored.
pub const DEFAULT_MIN_TEXT_LENGTH: usize = 20;

/// Number of child comments folded into the normalized text.
pub const DEFAULT_MAX_COMMENTS: usize = 5;

/// Default number of ranked results returned per batch.
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Default worker count (0 = rayon default).
pub const DEFAULT_WORKERS: usize = 0;

/// Characters of normalized text that feed the dedup fingerprint.
pub const DEFAULT_FINGERPRINT_PREFIX_CHARS: usize = 200;

/// Composite score at or above which a lead counts as qualified.
pub const DEFAULT_QUALIFICATION_THRESHOLD: f64 = 70.0;

/// Upper bound on the compounded context multiplier.
pub const DEFAULT_MAX_CONTEXT_MULTIPLIER: f64 = 1.5;

/// Profile used when no service description matches.
pub const DEFAULT_PROFILE: &str = "general";

/// Composite score range.
pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Per-rule match count is capped at this many before decay.
pub const MAX_COUNTED_MATCHES: usize = 3;

/// Geometric decay applied per repeated match.
pub const REPEAT_MATCH_DECAY: f64 = 0.8;

/// Authors and bodies that mean "no usable author / content".
pub const SENTINEL_DELETED: &str = "[deleted]";
pub const SENTINEL_REMOVED: &str = "[removed]";

/// Chars of text kept in a saved lead's preview.
pub const LEAD_PREVIEW_CHARS: usize = 500;
