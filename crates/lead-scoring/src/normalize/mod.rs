//! Text normalization: one lowercase, whitespace-collapsed string per item.
//!
//! Punctuation is kept on purpose: `$50,000`, `i'm`, and `?` all carry signal.

use std::sync::LazyLock;

use regex::Regex;

use lead_core::constants::DEFAULT_MAX_COMMENTS;
use lead_core::types::ContentItem;

static MARKDOWN_LINK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\([^)\s]*\)").ok());

static BARE_URL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)\S+").ok());

static LINE_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(?:#{1,6}|>+)[ \t]*").ok());

/// Builds the text every scorer sees for an item.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    max_comments: usize,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COMMENTS)
    }
}

impl TextNormalizer {
    pub fn new(max_comments: usize) -> Self {
        Self { max_comments }
    }

    /// Title and body joined by a space, followed by up to `max_comments`
    /// comment bodies, cleaned and lowercased.
    pub fn normalize(&self, item: &ContentItem) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(2 + self.max_comments);
        parts.extend(item.title.as_deref());
        parts.extend(item.body.as_deref());
        parts.extend(
            item.comments
                .iter()
                .filter_map(|c| c.body.as_deref().or(c.title.as_deref()))
                .take(self.max_comments),
        );
        self.normalize_text(&parts.join(" "))
    }

    /// Title and body only, without comments. What the author wrote.
    pub fn normalize_post(&self, item: &ContentItem) -> String {
        let parts: Vec<&str> = item
            .title
            .as_deref()
            .into_iter()
            .chain(item.body.as_deref())
            .collect();
        self.normalize_text(&parts.join(" "))
    }

    /// Normalize a single piece of text.
    pub fn normalize_text(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }
        let mut text = raw.to_string();
        if let Some(re) = MARKDOWN_LINK.as_ref() {
            text = re.replace_all(&text, "$1").into_owned();
        }
        if let Some(re) = BARE_URL.as_ref() {
            text = re.replace_all(&text, " ").into_owned();
        }
        if let Some(re) = LINE_MARKER.as_ref() {
            text = re.replace_all(&text, "").into_owned();
        }

        let cleaned: String = text
            .chars()
            .filter(|c| !matches!(c, '*' | '`' | '~'))
            .map(|c| match c {
                '\u{2018}' | '\u{2019}' | '\u{02BC}' => '\'',
                '\u{201C}' | '\u{201D}' => '"',
                other => other,
            })
            .collect();

        cleaned
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}
