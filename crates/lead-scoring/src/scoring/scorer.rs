//! Full scoring of one item against one profile.

use lead_core::config::ScoringConfig;
use lead_core::types::{ContentItem, DimensionScores, ScoreResult};

use super::classifier::{confidence, is_qualified, Classifier};
use super::composite::compose_detailed;
use super::context::{context_multipliers, profile_boosts, BoostContext};
use super::dimension::score_dimension_detailed;
use crate::patterns::{BoostSource, PatternLibrary, ScoringProfile};

/// Scores items for one profile. Holds only shared references, so one
/// scorer is shared by every worker in a run.
#[derive(Debug, Clone)]
pub struct ItemScorer<'a> {
    library: &'a PatternLibrary,
    profile: &'a ScoringProfile,
    classifier: Classifier,
    semantic_enabled: bool,
    max_multiplier: f64,
}

impl<'a> ItemScorer<'a> {
    pub fn new(library: &'a PatternLibrary, profile: &'a ScoringProfile, config: &ScoringConfig) -> Self {
        Self {
            library,
            profile,
            classifier: Classifier::default(),
            semantic_enabled: config.effective_semantic_analysis(),
            max_multiplier: config.effective_max_context_multiplier(),
        }
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn profile(&self) -> &ScoringProfile {
        self.profile
    }

    /// Every dimension the profile uses, plus any its boosts read.
    pub fn dimension_scores(&self, text: &str) -> DimensionScores {
        let boost_dimensions = self.profile.boosts.iter().filter_map(|b| match &b.source {
            BoostSource::Dimension { name, .. } => Some(name.as_str()),
            _ => None,
        });

        let mut scores = DimensionScores::new();
        for name in self.profile.all_dimensions().chain(boost_dimensions) {
            if scores.contains_key(name) {
                continue;
            }
            if let Some(set) = self.library.set(name) {
                let detail = score_dimension_detailed(text, set);
                if !detail.hits.is_empty() {
                    tracing::trace!(dimension = name, score = detail.score, hits = ?detail.hits, "dimension scored");
                }
                scores.insert(name.to_string(), detail.score);
            }
        }
        scores
    }

    /// Score a normalized item. `title` is the normalized title.
    pub fn score(
        &self,
        item: &ContentItem,
        text: &str,
        title: &str,
        fingerprint: Option<String>,
    ) -> ScoreResult {
        let dimension_scores = self.dimension_scores(text);
        let penalty: f64 = self
            .profile
            .penalty_dimensions
            .iter()
            .map(|d| dimension_scores.get(d).copied().unwrap_or(0.0))
            .sum();

        let multipliers =
            context_multipliers(item, text, &self.profile.context, self.max_multiplier);
        let boosts = profile_boosts(
            self.profile,
            &BoostContext {
                item,
                text,
                title,
                dimension_scores: &dimension_scores,
                semantic: &self.library.semantic,
                semantic_enabled: self.semantic_enabled,
            },
        );

        let composition = compose_detailed(
            &dimension_scores,
            &self.profile.weights,
            &multipliers,
            &boosts,
            penalty,
        );
        let score = composition.score;
        let (tier, priority) = self.classifier.classify(score, &dimension_scores);

        ScoreResult {
            item_id: item.id.clone(),
            author: item.author.clone(),
            qualified: is_qualified(score, tier, self.profile.qualification_threshold, false),
            confidence: confidence(score, &dimension_scores),
            composite_score: score,
            tier,
            priority,
            fingerprint,
            engagement: item.source_context.engagement_score,
            breakdown: Some(composition.breakdown),
            reason: None,
            dimension_scores,
        }
    }
}
