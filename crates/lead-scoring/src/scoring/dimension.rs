//! Per-dimension scoring with diminishing returns.

use serde::Serialize;

use lead_core::constants::{MAX_COUNTED_MATCHES, REPEAT_MATCH_DECAY};
use lead_core::types::collections::SmallVec4;

use crate::patterns::PatternSet;

/// One rule that fired.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleHit {
    pub label: String,
    pub matches: usize,
    pub contribution: f64,
}

/// Dimension score with the hits behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionDetail {
    pub name: String,
    pub score: f64,
    /// Sum before the cap.
    pub raw: f64,
    pub hits: SmallVec4<RuleHit>,
}

/// Contribution of a rule that matched `matches` times.
///
/// `weight × min(m, 3) × 0.8^(m−1)`: repeats add less and less, and
/// a flood of matches cannot outscore a handful.
#[inline]
pub fn diminishing_contribution(weight: f64, matches: usize) -> f64 {
    if matches == 0 {
        return 0.0;
    }
    let counted = matches.min(MAX_COUNTED_MATCHES) as f64;
    let decay = REPEAT_MATCH_DECAY.powi((matches - 1).min(i32::MAX as usize) as i32);
    weight * counted * decay
}

/// Score `text` against one pattern set.
pub fn score_dimension(text: &str, set: &PatternSet) -> f64 {
    score_dimension_detailed(text, set).score
}

/// Score `text` against one pattern set, keeping per-rule hits.
pub fn score_dimension_detailed(text: &str, set: &PatternSet) -> DimensionDetail {
    let mut hits = SmallVec4::new();
    let mut raw = 0.0;
    if !text.is_empty() {
        for rule in &set.rules {
            let matches = rule.matcher.count(text);
            if matches == 0 {
                continue;
            }
            let contribution = diminishing_contribution(rule.weight, matches);
            raw += contribution;
            hits.push(RuleHit {
                label: rule.label.clone(),
                matches,
                contribution,
            });
        }
    }

    let score = match set.cap {
        Some(cap) if !set.is_penalty() => raw.clamp(0.0, cap),
        _ => raw,
    };

    DimensionDetail {
        name: set.name.clone(),
        score,
        raw,
        hits,
    }
}
