//! xxh3 fingerprints of author plus a normalized-text prefix.

use xxhash_rust::xxh3::xxh3_64;

use lead_core::constants::DEFAULT_FINGERPRINT_PREFIX_CHARS;
use lead_core::types::ContentItem;

use crate::normalize::TextNormalizer;

/// Hex xxh3-64 of `author + ":" + first prefix_chars chars of normalized text`.
///
/// Near-identical reposts by the same author share a fingerprint as long as
/// they agree on the prefix.
#[inline]
pub fn fingerprint_text(author: &str, normalized: &str, prefix_chars: usize) -> String {
    let prefix_end = normalized
        .char_indices()
        .nth(prefix_chars)
        .map_or(normalized.len(), |(i, _)| i);
    let key = format!("{author}:{}", &normalized[..prefix_end]);
    format!("{:016x}", xxh3_64(key.as_bytes()))
}

/// Fingerprints whole items.
#[derive(Debug, Clone)]
pub struct Fingerprinter {
    normalizer: TextNormalizer,
    prefix_chars: usize,
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new(TextNormalizer::default(), DEFAULT_FINGERPRINT_PREFIX_CHARS)
    }
}

impl Fingerprinter {
    pub fn new(normalizer: TextNormalizer, prefix_chars: usize) -> Self {
        Self {
            normalizer,
            prefix_chars,
        }
    }

    pub fn fingerprint(&self, item: &ContentItem) -> String {
        let normalized = self.normalizer.normalize(item);
        self.fingerprint_normalized(item, &normalized)
    }

    /// Fingerprint when the normalized text is already at hand.
    pub fn fingerprint_normalized(&self, item: &ContentItem, normalized: &str) -> String {
        fingerprint_text(
            item.author.as_deref().unwrap_or_default(),
            normalized,
            self.prefix_chars,
        )
    }
}
