//! Tier classification.
//!
//! An ordered threshold table; the first row whose composite floor and
//! dimension gates all hold wins. A high composite that misses a gate falls
//! through to a lower row.

use lead_core::types::{Confidence, DimensionScores, Priority, Tier};

/// One row of the tier table.
#[derive(Debug, Clone, PartialEq)]
pub struct TierRule {
    pub min_score: f64,
    pub min_budget: f64,
    pub min_authority: f64,
    pub tier: Tier,
    pub priority: Priority,
}

impl TierRule {
    fn applies(&self, composite: f64, budget: f64, authority: f64) -> bool {
        composite >= self.min_score && budget >= self.min_budget && authority >= self.min_authority
    }
}

/// The standard table, highest tier first.
pub fn default_tier_rules() -> Vec<TierRule> {
    vec![
        TierRule {
            min_score: 90.0,
            min_budget: 15.0,
            min_authority: 12.0,
            tier: Tier::Platinum,
            priority: Priority::Immediate,
        },
        TierRule {
            min_score: 80.0,
            min_budget: 10.0,
            min_authority: 0.0,
            tier: Tier::Gold,
            priority: Priority::High,
        },
        TierRule {
            min_score: 70.0,
            min_budget: 5.0,
            min_authority: 0.0,
            tier: Tier::Silver,
            priority: Priority::Medium,
        },
        TierRule {
            min_score: 60.0,
            min_budget: 0.0,
            min_authority: 0.0,
            tier: Tier::Bronze,
            priority: Priority::Low,
        },
    ]
}

/// Maps composite scores to tiers, priorities, and confidence.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<TierRule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(default_tier_rules())
    }
}

impl Classifier {
    pub fn new(rules: Vec<TierRule>) -> Self {
        Self { rules }
    }

    /// First matching row, or `Unqualified` when none match.
    pub fn classify(&self, composite: f64, dimension_scores: &DimensionScores) -> (Tier, Priority) {
        let budget = dimension(dimension_scores, "budget");
        let authority = dimension(dimension_scores, "authority");
        self.rules
            .iter()
            .find(|r| r.applies(composite, budget, authority))
            .map(|r| (r.tier, r.priority))
            .unwrap_or((Tier::Unqualified, Priority::None))
    }
}

/// Standard-table classification.
pub fn classify(composite: f64, dimension_scores: &DimensionScores) -> (Tier, Priority) {
    Classifier::default().classify(composite, dimension_scores)
}

/// Qualified iff over the profile threshold, tiered, and not an advisor post.
pub fn is_qualified(composite: f64, tier: Tier, threshold: f64, non_prospect: bool) -> bool {
    composite >= threshold && tier.is_scored() && tier != Tier::Unqualified && !non_prospect
}

/// Confidence from composite level and how many of urgency, budget, and
/// authority scored at least 10.
pub fn confidence(composite: f64, dimension_scores: &DimensionScores) -> Confidence {
    let strong_signals = ["urgency", "budget", "authority"]
        .iter()
        .filter(|d| dimension(dimension_scores, d) >= 10.0)
        .count();
    match (composite, strong_signals) {
        (c, s) if c >= 85.0 && s >= 2 => Confidence::VeryHigh,
        (c, s) if c >= 75.0 && s >= 1 => Confidence::High,
        (c, _) if c >= 65.0 => Confidence::Medium,
        (c, _) if c >= 55.0 => Confidence::Low,
        _ => Confidence::VeryLow,
    }
}

fn dimension(scores: &DimensionScores, name: &str) -> f64 {
    scores.get(name).copied().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(budget: f64, authority: f64) -> DimensionScores {
        let mut d = DimensionScores::new();
        d.insert("budget".to_string(), budget);
        d.insert("authority".to_string(), authority);
        d
    }

    #[test]
    fn platinum_needs_both_gates() {
        assert_eq!(classify(92.0, &dims(20.0, 15.0)), (Tier::Platinum, Priority::Immediate));
        assert_eq!(classify(92.0, &dims(20.0, 5.0)), (Tier::Gold, Priority::High));
    }

    #[test]
    fn failed_gates_fall_through_to_bronze() {
        assert_eq!(classify(92.0, &dims(2.0, 2.0)), (Tier::Bronze, Priority::Low));
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(classify(80.0, &dims(10.0, 0.0)).0, Tier::Gold);
        assert_eq!(classify(70.0, &dims(5.0, 0.0)).0, Tier::Silver);
        assert_eq!(classify(60.0, &dims(0.0, 0.0)).0, Tier::Bronze);
        assert_eq!(classify(59.99, &dims(100.0, 100.0)).0, Tier::Unqualified);
    }

    #[test]
    fn missing_dimensions_count_as_zero() {
        let (tier, priority) = classify(95.0, &DimensionScores::new());
        assert_eq!((tier, priority), (Tier::Bronze, Priority::Low));
    }

    #[test]
    fn qualification_rule() {
        assert!(is_qualified(75.0, Tier::Silver, 70.0, false));
        assert!(!is_qualified(65.0, Tier::Bronze, 70.0, false));
        assert!(!is_qualified(75.0, Tier::Unqualified, 70.0, false));
        assert!(!is_qualified(95.0, Tier::Platinum, 70.0, true));
        assert!(!is_qualified(95.0, Tier::Filtered, 70.0, false));
    }

    #[test]
    fn confidence_levels() {
        let mut strong = dims(50.0, 50.0);
        strong.insert("urgency".into(), 0.0);
        assert_eq!(confidence(90.0, &strong), Confidence::VeryHigh);
        assert_eq!(confidence(80.0, &dims(50.0, 0.0)), Confidence::High);
        assert_eq!(confidence(80.0, &DimensionScores::new()), Confidence::Medium);
        assert_eq!(confidence(56.0, &DimensionScores::new()), Confidence::Low);
        assert_eq!(confidence(10.0, &strong), Confidence::VeryLow);
    }
}
