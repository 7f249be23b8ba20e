//! Scoring outputs: per-item results and ranked batches.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::InputError;

/// Dimension name → score. Ordered so serialized output is stable.
pub type DimensionScores = BTreeMap<String, f64>;

/// Qualification tier. The first five come from the classifier; the rest
/// are dispositions for items that never reached full scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Platinum,
    Gold,
    Silver,
    Bronze,
    Unqualified,
    /// Advisor / content-creator post.
    Filtered,
    /// Fingerprint already seen.
    Duplicate,
    /// Dropped by the pre-filter.
    Rejected,
    /// Malformed input.
    Invalid,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Platinum => "platinum",
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Bronze => "bronze",
            Self::Unqualified => "unqualified",
            Self::Filtered => "filtered",
            Self::Duplicate => "duplicate",
            Self::Rejected => "rejected",
            Self::Invalid => "invalid",
        }
    }

    /// True for tiers assigned by the classifier, which are the only ones ranked.
    pub fn is_scored(&self) -> bool {
        matches!(
            self,
            Self::Platinum | Self::Gold | Self::Silver | Self::Bronze | Self::Unqualified
        )
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Follow-up urgency attached to a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Immediate,
    High,
    Medium,
    Low,
    None,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::None => "none",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much the score should be trusted, from composite level and
/// the number of strong intent signals behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    VeryHigh,
    High,
    Medium,
    Low,
    VeryLow,
}

/// How a composite score was assembled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeBreakdown {
    /// Weighted sum of positive dimensions.
    pub base: f64,
    /// Compounded, capped context multiplier.
    pub multiplier: f64,
    /// Flat boosts after their individual caps.
    pub boosts: BTreeMap<String, f64>,
    /// Unweighted sum of penalty dimensions (usually <= 0).
    pub penalty: f64,
    /// Score before the final clamp.
    pub raw: f64,
}

/// Scoring outcome for a single item. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub item_id: String,
    pub author: Option<String>,
    pub dimension_scores: DimensionScores,
    /// Always within `[0, 100]`.
    pub composite_score: f64,
    pub tier: Tier,
    pub priority: Priority,
    pub qualified: bool,
    pub confidence: Confidence,
    pub fingerprint: Option<String>,
    /// Community engagement copied from the source context, used in ranking.
    pub engagement: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<CompositeBreakdown>,
    /// Why the item was excluded, for disposition tiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ScoreResult {
    /// A result for an item that never reached full scoring.
    pub fn disposition(
        item_id: impl Into<String>,
        author: Option<String>,
        tier: Tier,
        score: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            author,
            dimension_scores: DimensionScores::new(),
            composite_score: score,
            tier,
            priority: Priority::None,
            qualified: false,
            confidence: Confidence::VeryLow,
            fingerprint: None,
            engagement: 0,
            breakdown: None,
            reason: Some(reason.into()),
        }
    }

    /// Score for one dimension, 0 when the profile did not use it.
    pub fn dimension(&self, name: &str) -> f64 {
        self.dimension_scores.get(name).copied().unwrap_or(0.0)
    }
}

/// Per-disposition counts for a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total: usize,
    pub scored: usize,
    pub qualified: usize,
    pub invalid: usize,
    pub rejected: usize,
    pub duplicates: usize,
    pub filtered: usize,
    /// Mean composite over scored items, 0 when none were scored.
    pub average_score: f64,
}

impl BatchStats {
    /// Tally dispositions across both ranked and excluded results.
    pub fn from_results<'a>(total: usize, results: impl IntoIterator<Item = &'a ScoreResult>) -> Self {
        let mut stats = Self {
            total,
            ..Default::default()
        };
        let mut score_sum = 0.0;
        for r in results {
            match r.tier {
                Tier::Invalid => stats.invalid += 1,
                Tier::Rejected => stats.rejected += 1,
                Tier::Duplicate => stats.duplicates += 1,
                Tier::Filtered => stats.filtered += 1,
                _ => {
                    stats.scored += 1;
                    score_sum += r.composite_score;
                    if r.qualified {
                        stats.qualified += 1;
                    }
                }
            }
        }
        if stats.scored > 0 {
            stats.average_score = score_sum / stats.scored as f64;
        }
        stats
    }
}

/// Output of one pipeline run. Always a partial result: bad items are
/// reported, never fatal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankedBatch {
    /// Scored items, best first, truncated to the requested maximum.
    pub ranked: Vec<ScoreResult>,
    /// Items that were filtered, duplicated, rejected, or invalid.
    pub excluded: Vec<ScoreResult>,
    pub stats: BatchStats,
    /// Malformed items that were skipped.
    pub errors: Vec<InputError>,
}

impl RankedBatch {
    /// Ranked results that meet the profile's qualification rule.
    pub fn qualified(&self) -> impl Iterator<Item = &ScoreResult> {
        self.ranked.iter().filter(|r| r.qualified)
    }

    /// Every result with the given tier, ranked or excluded.
    pub fn with_tier(&self, tier: Tier) -> impl Iterator<Item = &ScoreResult> {
        self.ranked
            .iter()
            .chain(self.excluded.iter())
            .filter(move |r| r.tier == tier)
    }

    pub fn find(&self, item_id: &str) -> Option<&ScoreResult> {
        self.ranked
            .iter()
            .chain(self.excluded.iter())
            .find(|r| r.item_id == item_id)
    }

    pub fn skipped_count(&self) -> usize {
        self.errors.len()
    }

    /// Serialize for the presentation layer.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
