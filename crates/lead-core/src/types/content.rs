//! Scraped content items as handed to the pipeline.

use serde::{Deserialize, Serialize};

use crate::constants::{SENTINEL_DELETED, SENTINEL_REMOVED};
use crate::errors::InputError;

/// Where an item was found and how the community reacted to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceContext {
    /// Community (subreddit) name, without prefix.
    pub community: Option<String>,
    /// Net upvotes or equivalent.
    pub engagement_score: i64,
    pub comment_count: u32,
    pub created_utc: Option<i64>,
    /// Search term that surfaced the item.
    pub search_term: Option<String>,
    pub permalink: Option<String>,
}

/// A post or comment to be scored. Comments nest one level deep in practice
/// but the type allows arbitrary depth.
///
/// Items are treated as immutable once handed to the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub source_context: SourceContext,
    #[serde(default)]
    pub comments: Vec<ContentItem>,
}

impl ContentItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_community(mut self, community: impl Into<String>) -> Self {
        self.source_context.community = Some(community.into());
        self
    }

    pub fn with_engagement(mut self, score: i64) -> Self {
        self.source_context.engagement_score = score;
        self
    }

    pub fn with_comment(mut self, comment: ContentItem) -> Self {
        self.comments.push(comment);
        self.source_context.comment_count = self.comments.len() as u32;
        self
    }

    /// Title, if present and not blank.
    pub fn title_text(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }

    /// Body, if present and not blank.
    pub fn body_text(&self) -> Option<&str> {
        non_blank(self.body.as_deref())
    }

    /// Checks the item carries enough to be scored: an id, an author
    /// field, and at least one of title or body.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.id.trim().is_empty() {
            return Err(InputError::MissingId);
        }
        if non_blank(self.author.as_deref()).is_none() {
            return Err(InputError::MissingAuthor {
                id: self.id.clone(),
            });
        }
        if self.title_text().is_none() && self.body_text().is_none() {
            return Err(InputError::MissingText {
                id: self.id.clone(),
            });
        }
        Ok(())
    }

    /// True when the author or the post text is a deletion sentinel.
    pub fn is_deleted(&self) -> bool {
        let author_gone = self.author.as_deref().is_some_and(is_sentinel);
        let mut texts = [self.title_text(), self.body_text()]
            .into_iter()
            .flatten()
            .peekable();
        let text_gone = texts.peek().is_some() && texts.all(is_sentinel);
        author_gone || text_gone
    }

    /// Number of direct comments whose text asks a question.
    pub fn question_comment_count(&self) -> usize {
        self.comments
            .iter()
            .filter(|c| {
                c.body.as_deref().is_some_and(|b| b.contains('?'))
                    || c.title.as_deref().is_some_and(|t| t.contains('?'))
            })
            .count()
    }
}

/// True for the `[deleted]` / `[removed]` sentinels, ignoring surrounding whitespace.
pub fn is_sentinel(value: &str) -> bool {
    let v = value.trim();
    v.eq_ignore_ascii_case(SENTINEL_DELETED) || v.eq_ignore_ascii_case(SENTINEL_REMOVED)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_requires_author_and_text() {
        let ok = ContentItem::new("a").with_author("u").with_title("hello");
        assert!(ok.validate().is_ok());

        let no_author = ContentItem::new("b").with_title("hello");
        assert_eq!(
            no_author.validate(),
            Err(InputError::MissingAuthor { id: "b".into() })
        );

        let no_text = ContentItem::new("c").with_author("u").with_body("   ");
        assert_eq!(
            no_text.validate(),
            Err(InputError::MissingText { id: "c".into() })
        );

        let no_id = ContentItem::new(" ").with_author("u").with_title("x");
        assert_eq!(no_id.validate(), Err(InputError::MissingId));
    }

    #[test]
    fn deleted_posts_are_detected() {
        let by_author = ContentItem::new("a").with_author("[deleted]").with_title("need help");
        assert!(by_author.is_deleted());

        let by_body = ContentItem::new("b").with_author("u").with_body("[removed]");
        assert!(by_body.is_deleted());

        let titled_with_removed_body = ContentItem::new("c")
            .with_author("u")
            .with_title("need a designer")
            .with_body("[removed]");
        assert!(!titled_with_removed_body.is_deleted());

        let live = ContentItem::new("d").with_author("u").with_body("need a designer");
        assert!(!live.is_deleted());
    }

    #[test]
    fn question_comments_are_counted() {
        let item = ContentItem::new("p")
            .with_comment(ContentItem::new("c1").with_body("how much?"))
            .with_comment(ContentItem::new("c2").with_body("nice"))
            .with_comment(ContentItem::new("c3").with_body("when? where?"));
        assert_eq!(item.question_comment_count(), 2);
        assert_eq!(item.source_context.comment_count, 3);
    }

    #[test]
    fn deserializes_with_missing_optional_fields() {
        let item: ContentItem = serde_json::from_str(r#"{"id":"x1","title":"hi"}"#).unwrap();
        assert_eq!(item.id, "x1");
        assert!(item.author.is_none());
        assert!(item.comments.is_empty());
        assert_eq!(item.source_context.engagement_score, 0);
    }
}
