//! Deduplication configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_FINGERPRINT_PREFIX_CHARS;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DedupConfig {
    /// Chars of normalized text hashed into a fingerprint. Default: 200.
    pub prefix_chars: Option<usize>,
}

impl DedupConfig {
    /// Returns the effective fingerprint prefix length, defaulting to 200.
    pub fn effective_prefix_chars(&self) -> usize {
        self.prefix_chars.unwrap_or(DEFAULT_FINGERPRINT_PREFIX_CHARS)
    }
}
