//! Data model shared across the engine.

pub mod collections;
pub mod content;
pub mod lead;
pub mod score;

pub use collections::{FxHashMap, FxHashSet};
pub use content::{ContentItem, SourceContext};
pub use lead::{LeadStatus, SavedLead};
pub use score::{
    BatchStats, CompositeBreakdown, Confidence, DimensionScores, Priority, RankedBatch,
    ScoreResult, Tier,
};
