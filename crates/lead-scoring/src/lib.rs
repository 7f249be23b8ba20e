//! # lead-scoring
//!
//! Scoring engine for the lead qualification pipeline.
//! Provides text normalization, pattern libraries, dimension and
//! composite scoring, tier classification, pre-filtering, advisor
//! detection, fingerprint dedup, and batch orchestration.

pub mod crm;
pub mod dedup;
pub mod filters;
pub mod normalize;
pub mod patterns;
pub mod pipeline;
pub mod scoring;

pub use crm::InMemoryCrm;
pub use dedup::{DeduplicationStore, Fingerprinter};
pub use normalize::TextNormalizer;
pub use patterns::{LibraryLoader, PatternLibrary, PatternRegistry, ScoringProfile};
pub use pipeline::LeadPipeline;
pub use scoring::{Classifier, ItemScorer};
