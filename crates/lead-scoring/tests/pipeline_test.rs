//! End-to-end pipeline tests against the embedded sample library.
//! Scenarios: platinum lead, advisor post, duplicates, rejections,
//! malformed input, ranking, collaborators.

use std::sync::Arc;

use lead_core::config::LeadConfig;
use lead_core::errors::{CollaboratorError, ConfigError, PipelineError};
use lead_core::traits::ContentSource;
use lead_core::types::{ContentItem, FxHashSet, Priority, Tier};
use lead_scoring::{DeduplicationStore, InMemoryCrm, LeadPipeline, LibraryLoader};

const PLATINUM_TITLE: &str =
    "URGENT: need a supplier ASAP, budget approved $50,000, I'm the founder";

fn pipeline() -> LeadPipeline {
    LeadPipeline::new(LibraryLoader::load_default().unwrap(), LeadConfig::default()).unwrap()
}

fn platinum_item(id: &str) -> ContentItem {
    ContentItem::new(id).with_author("buyer").with_title(PLATINUM_TITLE)
}

fn modest_item(id: &str, author: &str) -> ContentItem {
    ContentItem::new(id)
        .with_author(author)
        .with_title("Looking for a freelancer for a small project")
}

// ── Worked scenarios ──────────────────────────────────────────────────────

#[test]
fn urgent_founder_post_is_platinum_and_qualified() {
    let store = DeduplicationStore::new();
    let batch = pipeline().run(&[platinum_item("t3_1")], "general", &store).unwrap();

    assert_eq!(batch.ranked.len(), 1);
    let result = &batch.ranked[0];
    assert_eq!(result.tier, Tier::Platinum);
    assert_eq!(result.priority, Priority::Immediate);
    assert!(result.qualified);
    assert!(result.composite_score >= 90.0, "got {}", result.composite_score);
    assert!(result.fingerprint.is_some());
    assert_eq!(batch.stats.qualified, 1);
    assert!(batch.errors.is_empty());
}

#[test]
fn advisor_post_is_filtered_despite_buying_words() {
    let item = ContentItem::new("t3_adv")
        .with_author("coach")
        .with_title("How I landed my first clients: lessons learned")
        .with_body(
            "Here's how I grew my business. I help small business owners. \
             Urgent budget $50k, I'm the CEO.",
        );
    let store = DeduplicationStore::new();
    let batch = pipeline().run(&[item], "general", &store).unwrap();

    assert!(batch.ranked.is_empty());
    let result = batch.find("t3_adv").unwrap();
    assert_eq!(result.tier, Tier::Filtered);
    assert_eq!(result.composite_score, 3.0);
    assert!(!result.qualified);
    assert_eq!(batch.stats.filtered, 1);
}

#[test]
fn founder_ama_story_is_filtered() {
    let item = ContentItem::new("t3_ama")
        .with_author("founder")
        .with_title("My journey building a 7-figure business - AMA")
        .with_body("Here's how I did it, lessons learned along the way");
    let store = DeduplicationStore::new();
    let batch = pipeline().run(&[item], "general", &store).unwrap();

    assert!(batch.ranked.is_empty());
    let result = batch.find("t3_ama").unwrap();
    assert_eq!(result.tier, Tier::Filtered);
    assert!(!result.qualified);
}

#[test]
fn pitches_in_replies_do_not_filter_the_buyer() {
    let item = ContentItem::new("t3_buyer")
        .with_author("shop_owner")
        .with_title("Looking for a web developer for our company website, budget $5,000")
        .with_comment(
            ContentItem::new("c1")
                .with_body("I help small businesses with exactly this, here's how I'd approach it"),
        );
    let store = DeduplicationStore::new();
    let batch = pipeline().run(&[item], "general", &store).unwrap();

    let result = batch.find("t3_buyer").unwrap();
    assert_ne!(result.tier, Tier::Filtered);
    assert!(result.tier.is_scored(), "got {:?}", result.tier);
    assert_eq!(batch.ranked.len(), 1);
}

#[test]
fn repeated_item_scores_once() {
    let store = DeduplicationStore::new();
    let batch = pipeline()
        .run(&[platinum_item("t3_a"), platinum_item("t3_b")], "general", &store)
        .unwrap();

    assert_eq!(batch.ranked.len(), 1);
    assert_eq!(batch.ranked[0].item_id, "t3_a");
    let dup = batch.find("t3_b").unwrap();
    assert_eq!(dup.tier, Tier::Duplicate);
    assert_eq!(dup.composite_score, 0.0);
    assert_eq!(batch.stats.duplicates, 1);
}

#[test]
fn shared_prefix_with_different_tail_is_a_duplicate() {
    let common = "we are looking for a freelancer to build our small business website \
                  and we have a clear scope, a timeline and a budget ready to go. "
        .repeat(2);
    assert!(common.chars().count() > 200);
    let first = ContentItem::new("t3_p1")
        .with_author("owner")
        .with_body(format!("{common}contact me by email"));
    let second = ContentItem::new("t3_p2")
        .with_author("owner")
        .with_body(format!("{common}send me a message anytime"));

    let store = DeduplicationStore::new();
    let batch = pipeline().run(&[first, second], "general", &store).unwrap();
    assert!(batch.find("t3_p1").unwrap().tier.is_scored());
    assert_eq!(batch.find("t3_p2").unwrap().tier, Tier::Duplicate);
}

#[test]
fn same_text_from_different_authors_is_not_a_duplicate() {
    let store = DeduplicationStore::new();
    let batch = pipeline()
        .run(&[modest_item("t3_1", "alice"), modest_item("t3_2", "bob")], "general", &store)
        .unwrap();
    assert_eq!(batch.ranked.len(), 2);
    assert_eq!(batch.stats.duplicates, 0);
}

// ── Dedup store lifecycle ─────────────────────────────────────────────────

#[test]
fn store_carries_across_runs_until_reset() {
    let pipeline = pipeline();
    let store = DeduplicationStore::new();

    let first = pipeline.run(&[platinum_item("t3_1")], "general", &store).unwrap();
    assert_eq!(first.ranked.len(), 1);

    let second = pipeline.run(&[platinum_item("t3_1")], "general", &store).unwrap();
    assert!(second.ranked.is_empty());
    assert_eq!(second.find("t3_1").unwrap().tier, Tier::Duplicate);

    store.reset();
    let third = pipeline.run(&[platinum_item("t3_1")], "general", &store).unwrap();
    assert_eq!(third.ranked.len(), 1);
}

#[test]
fn store_grows_with_every_new_fingerprint() {
    let pipeline = pipeline();
    let store = DeduplicationStore::new();
    for i in 0..5 {
        let item = modest_item(&format!("t3_{i}"), &format!("author{i}"));
        pipeline.run(&[item], "general", &store).unwrap();
    }
    assert_eq!(store.len(), 5);
}

// ── Rejections and malformed input ────────────────────────────────────────

#[test]
fn prefilter_rejections_are_reported() {
    let items = vec![
        ContentItem::new("short").with_author("u").with_title("need help"),
        ContentItem::new("cat")
            .with_author("u")
            .with_title("look at this photo of my lovely cat today"),
        ContentItem::new("gone")
            .with_author("[deleted]")
            .with_title("need help with my business website please"),
    ];
    let store = DeduplicationStore::new();
    let batch = pipeline().run(&items, "general", &store).unwrap();

    assert!(batch.ranked.is_empty());
    assert_eq!(batch.stats.rejected, 3);
    assert!(batch.find("short").unwrap().reason.as_deref().unwrap().contains("too short"));
    assert_eq!(batch.find("cat").unwrap().reason.as_deref(), Some("no relevant vocabulary"));
    assert_eq!(batch.find("gone").unwrap().reason.as_deref(), Some("deleted or removed post"));
    assert!(store.is_empty());
}

#[test]
fn malformed_items_are_skipped_not_fatal() {
    let items = vec![
        ContentItem::new("").with_author("u").with_title("looking for a freelancer"),
        ContentItem::new("t3_noauthor").with_title("looking for a freelancer"),
        ContentItem::new("t3_notext").with_author("u"),
        platinum_item("t3_good"),
    ];
    let store = DeduplicationStore::new();
    let batch = pipeline().run(&items, "general", &store).unwrap();

    assert_eq!(batch.errors.len(), 3);
    assert_eq!(batch.stats.invalid, 3);
    assert_eq!(batch.stats.total, 4);
    assert_eq!(batch.find("t3_noauthor").unwrap().tier, Tier::Invalid);
    assert_eq!(batch.ranked.len(), 1);
    assert_eq!(batch.ranked[0].item_id, "t3_good");
}

#[test]
fn excluded_ids_are_rejected() {
    let mut saved = FxHashSet::default();
    saved.insert("t3_1".to_string());
    let pipeline = pipeline().with_exclusions(Arc::new(saved));
    let store = DeduplicationStore::new();

    let batch = pipeline.run(&[platinum_item("t3_1")], "general", &store).unwrap();
    let result = batch.find("t3_1").unwrap();
    assert_eq!(result.tier, Tier::Rejected);
    assert_eq!(result.reason.as_deref(), Some("already saved"));
}

#[test]
fn many_question_comments_mark_an_advisor_thread() {
    let mut item = ContentItem::new("t3_q")
        .with_author("host")
        .with_title("Looking for a contractor for a kitchen remodel");
    for i in 0..4 {
        item = item.with_comment(ContentItem::new(format!("c{i}")).with_body("what is your budget?"));
    }
    let store = DeduplicationStore::new();
    let batch = pipeline().run(&[item], "general", &store).unwrap();
    assert_eq!(batch.find("t3_q").unwrap().tier, Tier::Filtered);
}

// ── Ranking ───────────────────────────────────────────────────────────────

#[test]
fn ranked_best_first_and_truncated() {
    let items = vec![
        modest_item("t3_low", "a"),
        platinum_item("t3_top"),
        ContentItem::new("t3_mid")
            .with_author("c")
            .with_title("Hiring a contractor this week, budget is $5,000, quote please"),
    ];
    let store = DeduplicationStore::new();
    let batch = pipeline().run(&items, "general", &store).unwrap();

    assert_eq!(batch.ranked.len(), 3);
    assert_eq!(batch.ranked[0].item_id, "t3_top");
    assert!(batch
        .ranked
        .windows(2)
        .all(|w| w[0].composite_score >= w[1].composite_score));

    let store = DeduplicationStore::new();
    let limited = pipeline().run_with_limit(&items, "general", &store, 1).unwrap();
    assert_eq!(limited.ranked.len(), 1);
    assert_eq!(limited.ranked[0].item_id, "t3_top");
    assert_eq!(limited.stats.scored, 3);
}

#[test]
fn worker_pool_gives_same_results() {
    let items: Vec<_> = (0..20)
        .map(|i| {
            ContentItem::new(format!("t3_{i}"))
                .with_author(format!("author{i}"))
                .with_title(format!("Looking for a freelancer, budget ${i}00, need it this week"))
        })
        .collect();

    let config = LeadConfig {
        pipeline: lead_core::config::PipelineConfig {
            workers: Some(2),
            ..Default::default()
        },
        ..Default::default()
    };
    let pooled = LeadPipeline::new(LibraryLoader::load_default().unwrap(), config).unwrap();

    let a = pipeline().run(&items, "general", &DeduplicationStore::new()).unwrap();
    let b = pooled.run(&items, "general", &DeduplicationStore::new()).unwrap();
    let scores = |batch: &lead_core::RankedBatch| {
        batch
            .ranked
            .iter()
            .map(|r| (r.item_id.clone(), r.composite_score))
            .collect::<Vec<_>>()
    };
    assert_eq!(scores(&a), scores(&b));
}

// ── Configuration ─────────────────────────────────────────────────────────

fn pipeline_with(config: LeadConfig) -> Result<LeadPipeline, PipelineError> {
    LeadPipeline::new(LibraryLoader::load_default().unwrap(), config)
}

#[test]
fn negative_multiplier_cap_is_rejected_at_construction() {
    let config = LeadConfig {
        scoring: lead_core::config::ScoringConfig {
            max_context_multiplier: Some(-1.0),
            ..Default::default()
        },
        ..Default::default()
    };
    let err = pipeline_with(config).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Config(ConfigError::ValidationFailed { ref field, .. })
            if field == "scoring.max_context_multiplier"
    ));
}

#[test]
fn zero_fingerprint_prefix_is_rejected_at_construction() {
    let config = LeadConfig {
        dedup: lead_core::config::DedupConfig {
            prefix_chars: Some(0),
        },
        ..Default::default()
    };
    let err = pipeline_with(config).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Config(ConfigError::ValidationFailed { ref field, .. })
            if field == "dedup.prefix_chars"
    ));
}

// ── Profiles ──────────────────────────────────────────────────────────────

#[test]
fn unknown_profile_is_an_error() {
    let store = DeduplicationStore::new();
    let err = pipeline().run(&[platinum_item("t3_1")], "astrology", &store).unwrap_err();
    assert!(matches!(err, PipelineError::UnknownProfile(ref p) if p == "astrology"));
}

#[test]
fn service_description_selects_profile() {
    let item = ContentItem::new("t3_web")
        .with_author("shop")
        .with_title("Looking for a website developer for our shopify store redesign");
    let store = DeduplicationStore::new();
    let batch = pipeline()
        .run_for_service(&[item], "need a website developer", &store)
        .unwrap();
    let result = batch.find("t3_web").unwrap();
    assert!(result.dimension_scores.contains_key("web_specialization"));
    assert!(result.dimension("web_specialization") > 0.0);
}

// ── Collaborators ─────────────────────────────────────────────────────────

struct FixedSource(Vec<ContentItem>);

impl ContentSource for FixedSource {
    fn fetch(&self, _: &[String], _: &[String]) -> Result<Vec<ContentItem>, CollaboratorError> {
        Ok(self.0.clone())
    }
}

struct FailingSource;

impl ContentSource for FailingSource {
    fn fetch(&self, _: &[String], _: &[String]) -> Result<Vec<ContentItem>, CollaboratorError> {
        Err(CollaboratorError::Source("rate limited".to_string()))
    }
}

#[test]
fn runs_from_a_content_source() {
    let source = FixedSource(vec![platinum_item("t3_1"), modest_item("t3_2", "b")]);
    let store = DeduplicationStore::new();
    let communities = vec!["smallbusiness".to_string()];
    let terms = vec!["supplier".to_string()];
    let batch = pipeline()
        .run_from_source(&source, &communities, &terms, "general", &store)
        .unwrap();
    assert_eq!(batch.ranked.len(), 2);
}

#[test]
fn source_failures_surface_as_errors() {
    let store = DeduplicationStore::new();
    let err = pipeline()
        .run_from_source(&FailingSource, &[], &[], "general", &store)
        .unwrap_err();
    assert!(matches!(err, PipelineError::Source(CollaboratorError::Source(_))));

    let err = pipeline()
        .run_from_source(&FailingSource, &[], &[], "astrology", &store)
        .unwrap_err();
    assert!(matches!(err, PipelineError::UnknownProfile(_)));
}

#[test]
fn exported_leads_are_excluded_next_run() {
    let items = vec![platinum_item("t3_1").with_community("smallbusiness")];
    let crm = Arc::new(InMemoryCrm::new());
    let pipeline = pipeline();

    let batch = pipeline.run(&items, "general", &DeduplicationStore::new()).unwrap();
    let saved = pipeline.export_qualified(&batch, &items, crm.as_ref());
    assert_eq!(saved.data, 1);
    assert!(saved.is_clean());
    let lead = crm.get("t3_1").unwrap();
    assert_eq!(
        lead.source_link.as_deref(),
        Some("https://reddit.com/r/smallbusiness/comments/t3_1/")
    );

    let again = pipeline.export_qualified(&batch, &items, crm.as_ref());
    assert_eq!(again.data, 0);
    assert_eq!(again.error_count(), 1);

    let pipeline = pipeline.with_exclusions(crm.clone());
    let rerun = pipeline.run(&items, "general", &DeduplicationStore::new()).unwrap();
    assert_eq!(rerun.find("t3_1").unwrap().tier, Tier::Rejected);
}

#[test]
fn batch_serializes_for_presentation() {
    let store = DeduplicationStore::new();
    let batch = pipeline().run(&[platinum_item("t3_1")], "general", &store).unwrap();
    let json = batch.to_json().unwrap();
    assert!(json.contains("\"platinum\""));
    assert!(json.contains("\"t3_1\""));
}
