//! The lead pipeline.
//!
//! Per item: validate → normalize → pre-filter → dedup → non-prospect check
//! → score → classify. Item preparation and scoring run on a rayon pool;
//! dedup check-and-insert runs serially in input order so the first
//! occurrence in a batch always wins.

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::field::Empty;

use lead_core::config::LeadConfig;
use lead_core::errors::{InputError, PipelineError, PipelineResult};
use lead_core::traits::{ContentSource, ExclusionList, LeadSink, NoExclusions};
use lead_core::tracing::metrics;
use lead_core::types::{
    BatchStats, ContentItem, FxHashMap, RankedBatch, SavedLead, ScoreResult, Tier,
};

use super::ranking::rank;
use crate::dedup::{DeduplicationStore, Fingerprinter};
use crate::filters::{NonProspectDetector, PreFilter, Rejection};
use crate::normalize::TextNormalizer;
use crate::patterns::{LibraryLoader, PatternLibrary, PatternRegistry, ScoringProfile};
use crate::scoring::ItemScorer;

/// An item that passed validation and the pre-filter.
struct Candidate<'b> {
    item: &'b ContentItem,
    text: String,
    /// Title and body without comments; advisor detection reads only this.
    post: String,
    title: String,
    fingerprint: String,
}

/// Outcome of the parallel preparation phase.
enum Prepared<'b> {
    Invalid(InputError, &'b ContentItem),
    Rejected(Rejection, &'b ContentItem),
    Ready(Candidate<'b>),
}

/// Where each input item stands after dedup.
enum Slot<'b> {
    Done(ScoreResult),
    Pending(Candidate<'b>),
}

/// Scores batches of content against a pattern library.
///
/// The library lives behind a [`PatternRegistry`], so it can be reloaded
/// while the pipeline is shared; each run works on one snapshot.
pub struct LeadPipeline {
    registry: Arc<PatternRegistry>,
    config: LeadConfig,
    pool: Option<ThreadPool>,
    exclusions: Arc<dyn ExclusionList>,
}

impl std::fmt::Debug for LeadPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadPipeline")
            .field("config", &self.config)
            .field("workers", &self.pool.as_ref().map(ThreadPool::current_num_threads))
            .finish_non_exhaustive()
    }
}

impl LeadPipeline {
    pub fn new(library: PatternLibrary, config: LeadConfig) -> Result<Self, PipelineError> {
        Self::with_registry(Arc::new(PatternRegistry::new(library)), config)
    }

    /// Loads the library named by `config.patterns.library_path`, or the
    /// embedded default.
    pub fn from_config(config: LeadConfig) -> Result<Self, PipelineError> {
        let library = LibraryLoader::load_for_config(&config)?;
        Self::new(library, config)
    }

    pub fn with_registry(
        registry: Arc<PatternRegistry>,
        config: LeadConfig,
    ) -> Result<Self, PipelineError> {
        LeadConfig::validate(&config)?;
        let pool = match config.pipeline.effective_workers() {
            0 => None,
            workers => Some(
                ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("leadscore-worker-{i}"))
                    .build()
                    .map_err(|e| PipelineError::WorkerPool(e.to_string()))?,
            ),
        };
        Ok(Self {
            registry,
            config,
            pool,
            exclusions: Arc::new(NoExclusions),
        })
    }

    /// Items whose ids are on this list are rejected before scoring.
    pub fn with_exclusions(mut self, exclusions: Arc<dyn ExclusionList>) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn registry(&self) -> &Arc<PatternRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &LeadConfig {
        &self.config
    }

    /// Score `batch` with the named profile, keeping the configured
    /// `max_results`.
    pub fn run(
        &self,
        batch: &[ContentItem],
        profile: &str,
        store: &DeduplicationStore,
    ) -> Result<RankedBatch, PipelineError> {
        self.run_with_limit(batch, profile, store, self.config.pipeline.effective_max_results())
    }

    /// Score `batch` with the profile that best matches a free-text service
    /// description.
    pub fn run_for_service(
        &self,
        batch: &[ContentItem],
        service: &str,
        store: &DeduplicationStore,
    ) -> Result<RankedBatch, PipelineError> {
        let library = self.registry.snapshot();
        let profile = library
            .select_profile(service)
            .ok_or_else(|| PipelineError::UnknownProfile(service.to_string()))?;
        self.execute(
            &library,
            profile,
            batch,
            store,
            self.config.pipeline.effective_max_results(),
        )
    }

    pub fn run_with_limit(
        &self,
        batch: &[ContentItem],
        profile: &str,
        store: &DeduplicationStore,
        max_results: usize,
    ) -> Result<RankedBatch, PipelineError> {
        let library = self.registry.snapshot();
        let profile = library
            .profile(profile)
            .ok_or_else(|| PipelineError::UnknownProfile(profile.to_string()))?;
        self.execute(&library, profile, batch, store, max_results)
    }

    /// Fetch a batch from `source`, then run it.
    pub fn run_from_source(
        &self,
        source: &dyn ContentSource,
        communities: &[String],
        terms: &[String],
        profile: &str,
        store: &DeduplicationStore,
    ) -> Result<RankedBatch, PipelineError> {
        if self.registry.snapshot().profile(profile).is_none() {
            return Err(PipelineError::UnknownProfile(profile.to_string()));
        }
        let batch = source.fetch(communities, terms)?;
        tracing::debug!(
            communities = communities.len(),
            terms = terms.len(),
            fetched = batch.len(),
            "content fetched"
        );
        self.run(&batch, profile, store)
    }

    /// Save every qualified result of `batch` to `sink`.
    ///
    /// `items` must hold the items the batch was scored from. Save failures
    /// are collected, never fatal; the data is the number of leads saved.
    pub fn export_qualified(
        &self,
        batch: &RankedBatch,
        items: &[ContentItem],
        sink: &dyn LeadSink,
    ) -> PipelineResult<usize> {
        let by_id: FxHashMap<&str, &ContentItem> =
            items.iter().map(|item| (item.id.as_str(), item)).collect();

        let mut result = PipelineResult::new(0);
        for scored in batch.qualified() {
            let Some(item) = by_id.get(scored.item_id.as_str()) else {
                tracing::warn!(item_id = %scored.item_id, "qualified result has no source item");
                continue;
            };
            match sink.save_lead(SavedLead::from_result(scored, item)) {
                Ok(()) => result.data += 1,
                Err(e) => {
                    tracing::warn!(item_id = %scored.item_id, error = %e, "failed to save lead");
                    result.add_error(e.into());
                }
            }
        }
        result
    }

    fn execute(
        &self,
        library: &PatternLibrary,
        profile: &ScoringProfile,
        batch: &[ContentItem],
        store: &DeduplicationStore,
        max_results: usize,
    ) -> Result<RankedBatch, PipelineError> {
        let started = Instant::now();
        let span = tracing::info_span!(
            "leadscore.pipeline",
            batch_size = batch.len(),
            profile = %profile.name,
            scored_count = Empty,
            invalid_count = Empty,
            rejected_count = Empty,
            duplicate_count = Empty,
            filtered_count = Empty,
            qualified_count = Empty,
            run_duration_ms = Empty,
        );
        let _entered = span.enter();

        let pipeline = &self.config.pipeline;
        let normalizer = TextNormalizer::new(pipeline.effective_max_comments());
        let fingerprinter =
            Fingerprinter::new(normalizer.clone(), self.config.dedup.effective_prefix_chars());
        let prefilter = PreFilter::for_profile(pipeline.effective_min_text_length(), library, profile);
        let detector = NonProspectDetector::new(&library.advisor);
        let scorer = ItemScorer::new(library, profile, &self.config.scoring);
        let exclusions: &dyn ExclusionList = self.exclusions.as_ref();

        // Phase 1: validate, normalize, pre-filter, fingerprint.
        let prepared: Vec<Prepared<'_>> = self.install(|| {
            batch
                .par_iter()
                .map(|item| prepare(item, &normalizer, &fingerprinter, &prefilter, exclusions))
                .collect()
        });

        // Phase 2: dedup, serially in input order.
        let mut errors = Vec::new();
        let slots: Vec<Slot<'_>> = prepared
            .into_iter()
            .map(|p| match p {
                Prepared::Invalid(error, item) => {
                    tracing::warn!(item_id = %item.id, error = %error, "skipping malformed item");
                    let result = ScoreResult::disposition(
                        item.id.clone(),
                        item.author.clone(),
                        Tier::Invalid,
                        0.0,
                        error.to_string(),
                    );
                    errors.push(error);
                    Slot::Done(result)
                }
                Prepared::Rejected(rejection, item) => {
                    tracing::debug!(item_id = %item.id, reason = %rejection, "rejected");
                    Slot::Done(ScoreResult::disposition(
                        item.id.clone(),
                        item.author.clone(),
                        Tier::Rejected,
                        0.0,
                        rejection.to_string(),
                    ))
                }
                Prepared::Ready(candidate) => {
                    if store.check_and_insert(&candidate.fingerprint) {
                        tracing::debug!(item_id = %candidate.item.id, "duplicate");
                        let mut result = ScoreResult::disposition(
                            candidate.item.id.clone(),
                            candidate.item.author.clone(),
                            Tier::Duplicate,
                            0.0,
                            "fingerprint already seen",
                        );
                        result.fingerprint = Some(candidate.fingerprint);
                        Slot::Done(result)
                    } else {
                        Slot::Pending(candidate)
                    }
                }
            })
            .collect();

        // Phase 3: non-prospect check and full scoring.
        let results: Vec<ScoreResult> = self.install(|| {
            slots
                .into_par_iter()
                .map(|slot| match slot {
                    Slot::Done(result) => result,
                    Slot::Pending(candidate) => score_candidate(candidate, &detector, &scorer),
                })
                .collect()
        });

        let stats = BatchStats::from_results(batch.len(), &results);
        let (mut ranked, excluded): (Vec<_>, Vec<_>) =
            results.into_iter().partition(|r| r.tier.is_scored());
        rank(&mut ranked, max_results);

        let qualified = ranked.iter().filter(|r| r.qualified).count();
        let elapsed_ms = started.elapsed().as_millis() as u64;
        span.record(metrics::SCORED_COUNT, stats.scored);
        span.record(metrics::INVALID_COUNT, stats.invalid);
        span.record(metrics::REJECTED_COUNT, stats.rejected);
        span.record(metrics::DUPLICATE_COUNT, stats.duplicates);
        span.record(metrics::FILTERED_COUNT, stats.filtered);
        span.record(metrics::QUALIFIED_COUNT, qualified);
        span.record(metrics::RUN_DURATION_MS, elapsed_ms);
        tracing::info!(
            total = stats.total,
            scored = stats.scored,
            qualified,
            ranked = ranked.len(),
            average_score = stats.average_score,
            "batch scored"
        );

        Ok(RankedBatch {
            ranked,
            excluded,
            stats,
            errors,
        })
    }

    fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

fn prepare<'b>(
    item: &'b ContentItem,
    normalizer: &TextNormalizer,
    fingerprinter: &Fingerprinter,
    prefilter: &PreFilter,
    exclusions: &dyn ExclusionList,
) -> Prepared<'b> {
    if let Err(error) = item.validate() {
        return Prepared::Invalid(error, item);
    }
    let text = normalizer.normalize(item);
    if let Err(rejection) = prefilter.check(item, &text, exclusions) {
        return Prepared::Rejected(rejection, item);
    }
    let post = normalizer.normalize_post(item);
    let title = normalizer.normalize_text(item.title.as_deref().unwrap_or_default());
    let fingerprint = fingerprinter.fingerprint_normalized(item, &text);
    Prepared::Ready(Candidate {
        item,
        text,
        post,
        title,
        fingerprint,
    })
}

fn score_candidate(
    candidate: Candidate<'_>,
    detector: &NonProspectDetector<'_>,
    scorer: &ItemScorer<'_>,
) -> ScoreResult {
    let Candidate {
        item,
        text,
        post,
        title,
        fingerprint,
    } = candidate;

    if detector.is_non_prospect(&post, &title, item.question_comment_count()) {
        tracing::debug!(item_id = %item.id, "advisor post filtered");
        let mut result = ScoreResult::disposition(
            item.id.clone(),
            item.author.clone(),
            Tier::Filtered,
            detector.filtered_score(),
            "advisor or content-creator post",
        );
        result.fingerprint = Some(fingerprint);
        result.engagement = item.source_context.engagement_score;
        return result;
    }

    let result = scorer.score(item, &text, &title, Some(fingerprint));
    tracing::debug!(
        item_id = %item.id,
        score = result.composite_score,
        tier = %result.tier,
        "scored"
    );
    result
}
