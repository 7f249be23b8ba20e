//! Configuration system for the lead scoring engine.
//! TOML-based, 4-layer resolution: CLI > env > project > user > defaults.

pub mod dedup_config;
pub mod lead_config;
pub mod patterns_config;
pub mod pipeline_config;
pub mod scoring_config;

pub use dedup_config::DedupConfig;
pub use lead_config::{CliOverrides, LeadConfig};
pub use patterns_config::PatternsConfig;
pub use pipeline_config::PipelineConfig;
pub use scoring_config::ScoringConfig;
