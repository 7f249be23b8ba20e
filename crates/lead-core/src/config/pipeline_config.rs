//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_COMMENTS, DEFAULT_MAX_RESULTS, DEFAULT_MIN_TEXT_LENGTH, DEFAULT_WORKERS,
};

/// Configuration for batch processing.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PipelineConfig {
    /// Minimum normalized text length in chars. Default: 20.
    pub min_text_length: Option<usize>,
    /// Child comments folded into the normalized text. Default: 5.
    pub max_comments: Option<usize>,
    /// Ranked results returned per batch. Default: 50.
    pub max_results: Option<usize>,
    /// Worker threads for the scoring pool. 0 = rayon default.
    pub workers: Option<usize>,
}

impl PipelineConfig {
    pub fn effective_min_text_length(&self) -> usize {
        self.min_text_length.unwrap_or(DEFAULT_MIN_TEXT_LENGTH)
    }

    pub fn effective_max_comments(&self) -> usize {
        self.max_comments.unwrap_or(DEFAULT_MAX_COMMENTS)
    }

    pub fn effective_max_results(&self) -> usize {
        self.max_results.unwrap_or(DEFAULT_MAX_RESULTS)
    }

    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or(DEFAULT_WORKERS)
    }
}
