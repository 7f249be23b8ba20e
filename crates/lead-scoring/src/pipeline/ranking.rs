//! Ranking of scored results.

use std::cmp::Ordering;

use lead_core::types::ScoreResult;

/// Best first: composite, then urgency, budget, authority, engagement.
pub fn compare_results(a: &ScoreResult, b: &ScoreResult) -> Ordering {
    b.composite_score
        .total_cmp(&a.composite_score)
        .then_with(|| b.dimension("urgency").total_cmp(&a.dimension("urgency")))
        .then_with(|| b.dimension("budget").total_cmp(&a.dimension("budget")))
        .then_with(|| b.dimension("authority").total_cmp(&a.dimension("authority")))
        .then_with(|| b.engagement.cmp(&a.engagement))
}

/// Sort in place and keep at most `max_results`. The sort is stable, so
/// full ties keep input order.
pub fn rank(results: &mut Vec<ScoreResult>, max_results: usize) {
    results.sort_by(compare_results);
    results.truncate(max_results);
}
