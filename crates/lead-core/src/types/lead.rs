//! Leads as handed to a CRM.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ContentItem, Priority, ScoreResult};
use crate::constants::LEAD_PREVIEW_CHARS;

/// Follow-up state of a saved lead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Responded,
    Converted,
    Closed,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Responded => "responded",
            Self::Converted => "converted",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(Self::New),
            "contacted" => Ok(Self::Contacted),
            "responded" => Ok(Self::Responded),
            "converted" => Ok(Self::Converted),
            "closed" => Ok(Self::Closed),
            other => Err(format!("unknown lead status '{other}'")),
        }
    }
}

/// A lead stored by the CRM collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedLead {
    pub item_id: String,
    pub author: String,
    pub title: String,
    /// First chars of the post body.
    pub preview: String,
    pub source_link: Option<String>,
    pub community: Option<String>,
    pub score: f64,
    pub priority: Priority,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub notes: String,
}

impl SavedLead {
    /// Builds a lead from a scored item and the item it was scored from.
    pub fn from_result(result: &ScoreResult, item: &ContentItem) -> Self {
        let community = item.source_context.community.clone();
        let source_link = item.source_context.permalink.clone().or_else(|| {
            community
                .as_deref()
                .map(|c| format!("https://reddit.com/r/{c}/comments/{}/", item.id))
        });
        Self {
            item_id: item.id.clone(),
            author: item.author.clone().unwrap_or_default(),
            title: item.title.clone().unwrap_or_default(),
            preview: item
                .body
                .as_deref()
                .unwrap_or_default()
                .chars()
                .take(LEAD_PREVIEW_CHARS)
                .collect(),
            source_link,
            community,
            score: result.composite_score,
            priority: result.priority,
            status: LeadStatus::New,
            notes: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tier;

    #[test]
    fn lead_from_result_truncates_preview_and_links_source() {
        let item = ContentItem::new("abc123")
            .with_author("buyer")
            .with_title("need a supplier")
            .with_body("x".repeat(900))
            .with_community("smallbusiness");
        let mut result = ScoreResult::disposition("abc123", None, Tier::Gold, 84.0, "");
        result.priority = Priority::High;

        let lead = SavedLead::from_result(&result, &item);
        assert_eq!(lead.preview.chars().count(), LEAD_PREVIEW_CHARS);
        assert_eq!(
            lead.source_link.as_deref(),
            Some("https://reddit.com/r/smallbusiness/comments/abc123/")
        );
        assert_eq!(lead.priority, Priority::High);
        assert_eq!(lead.status, LeadStatus::New);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Contacted".parse::<LeadStatus>(), Ok(LeadStatus::Contacted));
        assert!("archived".parse::<LeadStatus>().is_err());
    }
}
