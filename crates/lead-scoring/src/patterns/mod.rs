//! Pattern libraries: typed, validated scoring configuration.
//!
//! A library is loaded once, validated up front, and shared read-only
//! behind an `Arc`. Reloads swap the whole library.

pub mod loader;
pub mod registry;
pub mod types;

pub use loader::{LibraryLoader, DEFAULT_LIBRARY_TOML};
pub use registry::PatternRegistry;
pub use types::{
    AdvisorRules, BoostRule, BoostSource, ContextRules, DimensionKind, Matcher, PatternLibrary,
    PatternSet, Rule, ScoringProfile, SemanticRules,
};
