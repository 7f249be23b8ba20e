//! Scoring configuration and capability flags.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_CONTEXT_MULTIPLIER;

/// Configuration for composite scoring.
///
/// Optional analysis stages are gated by explicit capability flags
/// instead of being switched on by whatever happens to be installed.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoringConfig {
    /// Enables the semantic relevance boost. Default: false.
    pub semantic_analysis_enabled: Option<bool>,
    /// Cap on the compounded context multiplier. Default: 1.5.
    pub max_context_multiplier: Option<f64>,
}

impl ScoringConfig {
    pub fn effective_semantic_analysis(&self) -> bool {
        self.semantic_analysis_enabled.unwrap_or(false)
    }

    pub fn effective_max_context_multiplier(&self) -> f64 {
        self.max_context_multiplier
            .unwrap_or(DEFAULT_MAX_CONTEXT_MULTIPLIER)
    }
}
