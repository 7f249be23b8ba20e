//! Context signals: community and professional-language multipliers,
//! engagement quality, semantic relevance, and profile boosts.

use lead_core::types::{ContentItem, DimensionScores};

use super::composite::{ContextMultipliers, FlatBoost};
use crate::patterns::{BoostSource, ContextRules, ScoringProfile, SemanticRules};

/// Upper bound on the raw engagement quality signal.
pub const MAX_ENGAGEMENT_QUALITY: f64 = 30.0;

/// Multipliers earned by where the item was posted and how it is written.
pub fn context_multipliers(
    item: &ContentItem,
    text: &str,
    rules: &ContextRules,
    cap: f64,
) -> ContextMultipliers {
    let mut multipliers = ContextMultipliers::new(cap);

    let community = item
        .source_context
        .community
        .as_deref()
        .map(|c| c.trim().to_lowercase().trim_start_matches("r/").to_string());
    if let Some(community) = community {
        if rules.high_value_communities.contains(&community) {
            multipliers.push("community", rules.community_multiplier);
        }
    }

    let professional_hits = rules
        .professional_terms
        .iter()
        .filter(|term| text.contains(term.as_str()))
        .count();
    if professional_hits >= rules.professional_min_hits && !rules.professional_terms.is_empty() {
        multipliers.push("professional_language", rules.professional_multiplier);
    }

    multipliers
}

/// How much real conversation and detail an item carries, in `[0, 30]`.
///
/// Substantive sentences in the body, questions asked, comment volume,
/// and long comments among the first five all add.
pub fn engagement_quality(item: &ContentItem) -> f64 {
    let body = item.body_text().unwrap_or_default();
    let sentences = body
        .split(['.', '!', '?'])
        .filter(|s| s.trim().chars().count() > 10)
        .count();
    let questions = body.matches('?').count();
    let comments = item
        .comments
        .len()
        .max(item.source_context.comment_count as usize);
    let detailed_comments = item
        .comments
        .iter()
        .take(5)
        .filter(|c| c.body.as_deref().is_some_and(|b| b.chars().count() > 100))
        .count();

    let score = (sentences as f64 * 2.0).min(15.0)
        + (questions as f64 * 3.0).min(10.0)
        + (comments as f64 * 2.0).min(20.0)
        + detailed_comments as f64 * 3.0;
    score.min(MAX_ENGAGEMENT_QUALITY)
}

/// Keyword-level relevance of the text to "someone needs a provider".
pub fn semantic_relevance(text: &str, title: &str, rules: &SemanticRules) -> f64 {
    let service_hits = rules
        .service_terms
        .iter()
        .filter(|t| text.contains(t.as_str()))
        .count();
    let need_hits = rules
        .need_terms
        .iter()
        .filter(|t| text.contains(t.as_str()))
        .count();
    let title_hits = rules
        .service_terms
        .iter()
        .chain(rules.need_terms.iter())
        .filter(|t| title.contains(t.as_str()))
        .count();

    let score = service_hits as f64 * rules.service_points
        + need_hits as f64 * rules.need_points
        + title_hits as f64 * rules.title_points;
    score.min(rules.cap)
}

/// Inputs shared by every boost of one item.
pub struct BoostContext<'a> {
    pub item: &'a ContentItem,
    pub text: &'a str,
    /// Lowercased title.
    pub title: &'a str,
    pub dimension_scores: &'a DimensionScores,
    pub semantic: &'a SemanticRules,
    pub semantic_enabled: bool,
}

/// Evaluate a profile's boosts. Semantic boosts are left out entirely
/// unless semantic analysis is enabled.
pub fn profile_boosts(profile: &ScoringProfile, ctx: &BoostContext<'_>) -> Vec<FlatBoost> {
    profile
        .boosts
        .iter()
        .filter_map(|boost| {
            let raw = match &boost.source {
                BoostSource::Terms(terms) => terms
                    .iter()
                    .filter(|(term, _)| ctx.text.contains(term.as_str()))
                    .map(|(_, points)| points)
                    .sum::<f64>(),
                BoostSource::Dimension { name, scale } => {
                    scale * ctx.dimension_scores.get(name).copied().unwrap_or(0.0)
                }
                BoostSource::Engagement { scale } => scale * engagement_quality(ctx.item),
                BoostSource::Semantic { scale } => {
                    if !ctx.semantic_enabled {
                        return None;
                    }
                    scale * semantic_relevance(ctx.text, ctx.title, ctx.semantic)
                }
            };
            Some(FlatBoost::new(boost.name.clone(), raw, boost.cap))
        })
        .collect()
}
