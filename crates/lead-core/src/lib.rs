//! # lead-core
//!
//! Foundation crate for the lead scoring engine:
//! - Types: content items, score results, tiers, ranked batches
//! - Traits: content source, exclusion list, and lead sink collaborators
//! - Errors: one `thiserror` enum per subsystem
//! - Config: TOML-based, 4-layer resolution
//! - Tracing: `EnvFilter`-driven subscriber setup

pub mod config;
pub mod constants;
pub mod errors;
pub mod traits;
pub mod tracing;
pub mod types;

// Re-exports for convenience
pub use config::LeadConfig;
pub use errors::{LeadErrorCode, PipelineError};
pub use types::{BatchStats, ContentItem, Priority, RankedBatch, ScoreResult, SourceContext, Tier};
