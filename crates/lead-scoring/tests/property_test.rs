//! Property tests: determinism, boundedness, diminishing returns,
//! dedup idempotence, advisor short-circuit, classifier gating.

use lead_core::config::{LeadConfig, ScoringConfig};
use lead_core::types::{ContentItem, DimensionScores, Tier};
use lead_scoring::patterns::{DimensionKind, PatternSet, Rule};
use lead_scoring::scoring::dimension::diminishing_contribution;
use lead_scoring::scoring::{classify, is_qualified, score_dimension};
use lead_scoring::{DeduplicationStore, ItemScorer, LeadPipeline, LibraryLoader, TextNormalizer};
use proptest::prelude::*;

const VOCAB: &[&str] = &[
    "urgent", "asap", "budget", "$5,000", "$20k", "ceo", "founder", "i'm the owner",
    "looking for", "hire", "free", "student", "scope", "timeline", "supplier", "great",
    "terrible", "this week", "quote", "our company", "the", "and", "website", "video",
];

fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VOCAB), 0..40).prop_map(|words| words.join(" "))
}

// ── Determinism and boundedness ───────────────────────────────────────────

proptest! {
    #[test]
    fn scoring_is_deterministic_and_bounded(text in text_strategy(), engagement in -50i64..5000) {
        let library = LibraryLoader::load_default().unwrap();
        let profile = library.profile("general").unwrap();
        let scorer = ItemScorer::new(&library, profile, &ScoringConfig::default());

        let item = ContentItem::new("p")
            .with_author("a")
            .with_body(text.clone())
            .with_engagement(engagement);
        let normalized = TextNormalizer::default().normalize(&item);

        let first = scorer.score(&item, &normalized, "", None);
        let second = scorer.score(&item, &normalized, "", None);
        prop_assert_eq!(first.composite_score, second.composite_score);
        prop_assert_eq!(first.tier, second.tier);
        prop_assert_eq!(&first.dimension_scores, &second.dimension_scores);

        prop_assert!((0.0..=100.0).contains(&first.composite_score));
        for (name, score) in &first.dimension_scores {
            let set = library.set(name).unwrap();
            match set.kind {
                DimensionKind::Positive => {
                    prop_assert!(*score >= 0.0, "{} = {}", name, score);
                    if let Some(cap) = set.cap {
                        prop_assert!(*score <= cap, "{} = {} > {}", name, score, cap);
                    }
                }
                DimensionKind::Penalty => prop_assert!(*score <= 0.0),
            }
        }
    }

    #[test]
    fn qualified_results_clear_threshold_and_tier(text in text_strategy()) {
        let library = LibraryLoader::load_default().unwrap();
        let profile = library.profile("general").unwrap();
        let scorer = ItemScorer::new(&library, profile, &ScoringConfig::default());
        let item = ContentItem::new("p").with_author("a").with_title(text);
        let normalized = TextNormalizer::default().normalize(&item);

        let result = scorer.score(&item, &normalized, &normalized, None);
        if result.qualified {
            prop_assert!(result.composite_score >= profile.qualification_threshold);
            prop_assert!(result.tier != Tier::Unqualified);
        }
    }
}

// ── Diminishing returns ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn second_match_adds_less_than_the_first(weight in 0.1f64..100.0) {
        let one = diminishing_contribution(weight, 1);
        let two = diminishing_contribution(weight, 2);
        prop_assert!(two > one);
        prop_assert!(two < 2.0 * one);
    }

    #[test]
    fn repeats_never_exceed_three_full_matches(weight in 0.1f64..100.0, matches in 0usize..500) {
        prop_assert!(diminishing_contribution(weight, matches) <= 3.0 * weight);
    }

    #[test]
    fn repeated_keyword_is_damped_in_a_set(repeats in 1usize..20) {
        let set = PatternSet::new("urgency", DimensionKind::Positive, Some(100.0))
            .with_rule(Rule::literal("urgent", "urgent", 10.0));
        let text = vec!["urgent"; repeats].join(" ");
        let score = score_dimension(&text, &set);
        prop_assert!(score <= 10.0 * 3.0);
        prop_assert!(score >= 10.0 * 0.8f64.powi(repeats as i32 - 1));
    }
}

// ── Dedup and advisor short-circuit ───────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn same_item_twice_yields_one_duplicate(text in text_strategy()) {
        let pipeline = LeadPipeline::new(LibraryLoader::load_default().unwrap(), LeadConfig::default()).unwrap();
        let body = format!("looking for a freelancer {text}");
        let items = vec![
            ContentItem::new("first").with_author("a").with_body(body.clone()),
            ContentItem::new("second").with_author("a").with_body(body),
        ];
        let batch = pipeline.run(&items, "general", &DeduplicationStore::new()).unwrap();

        let first = batch.find("first").unwrap();
        let second = batch.find("second").unwrap();
        prop_assert!(first.tier != Tier::Duplicate);
        prop_assert_eq!(second.tier, Tier::Duplicate);
        prop_assert_eq!(second.composite_score, 0.0);
        prop_assert_eq!(batch.stats.duplicates, 1);
    }

    #[test]
    fn advisor_posts_short_circuit_whatever_else_they_say(text in text_strategy()) {
        let pipeline = LeadPipeline::new(LibraryLoader::load_default().unwrap(), LeadConfig::default()).unwrap();
        let item = ContentItem::new("adv")
            .with_author("coach")
            .with_title("How I grew my agency: lessons learned")
            .with_body(format!("{text} urgent budget $50k ceo need help"));
        let batch = pipeline.run(&[item], "general", &DeduplicationStore::new()).unwrap();

        let result = batch.find("adv").unwrap();
        prop_assert_eq!(result.tier, Tier::Filtered);
        prop_assert_eq!(result.composite_score, 3.0);
        prop_assert!(!result.qualified);
        prop_assert!(batch.ranked.is_empty());
    }
}

// ── Classifier gating ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn tiers_respect_their_gates(
        composite in 0.0f64..=100.0,
        budget in 0.0f64..=100.0,
        authority in 0.0f64..=100.0,
        threshold in 0.0f64..=100.0,
    ) {
        let mut dims = DimensionScores::new();
        dims.insert("budget".to_string(), budget);
        dims.insert("authority".to_string(), authority);
        let (tier, _) = classify(composite, &dims);

        match tier {
            Tier::Platinum => prop_assert!(composite >= 90.0 && budget >= 15.0 && authority >= 12.0),
            Tier::Gold => prop_assert!(composite >= 80.0 && budget >= 10.0),
            Tier::Silver => prop_assert!(composite >= 70.0 && budget >= 5.0),
            Tier::Bronze => prop_assert!(composite >= 60.0),
            Tier::Unqualified => prop_assert!(composite < 60.0),
            other => prop_assert!(false, "classifier produced disposition tier {:?}", other),
        }

        prop_assert!(!is_qualified(composite, tier, threshold, true));
        if is_qualified(composite, tier, threshold, false) {
            prop_assert!(composite >= threshold && tier != Tier::Unqualified);
        }
    }
}
