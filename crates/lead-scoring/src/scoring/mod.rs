//! Scoring: per-dimension scores, composition, and classification.

pub mod classifier;
pub mod composite;
pub mod context;
pub mod dimension;
pub mod scorer;

pub use classifier::{classify, confidence, is_qualified, Classifier, TierRule};
pub use composite::{compose, compose_detailed, Composition, ContextMultipliers, FlatBoost};
pub use dimension::{score_dimension, score_dimension_detailed, DimensionDetail, RuleHit};
pub use scorer::ItemScorer;
