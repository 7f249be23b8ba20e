//! Top-level lead scoring configuration with 4-layer resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{DedupConfig, PatternsConfig, PipelineConfig, ScoringConfig};
use crate::errors::ConfigError;

/// Project-level config file name.
pub const PROJECT_CONFIG_FILE: &str = "leadscore.toml";

/// Upper bound on the worker pool size.
const MAX_WORKERS: usize = 256;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`LEADSCORE_*`)
/// 3. Project config (`leadscore.toml` in project root)
/// 4. User config (`~/.leadscore/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LeadConfig {
    pub pipeline: PipelineConfig,
    pub dedup: DedupConfig,
    pub scoring: ScoringConfig,
    pub patterns: PatternsConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub max_results: Option<usize>,
    pub workers: Option<usize>,
    pub library_path: Option<String>,
    pub default_profile: Option<String>,
    pub semantic_analysis_enabled: Option<bool>,
}

impl LeadConfig {
    /// Load configuration with 4-layer resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(
                            path = %user_config_path.display(),
                            error = %e,
                            "ignoring unreadable user config"
                        );
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &LeadConfig) -> Result<(), ConfigError> {
        if config.pipeline.min_text_length == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "pipeline.min_text_length".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.pipeline.max_results == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "pipeline.max_results".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(workers) = config.pipeline.workers {
            if workers > MAX_WORKERS {
                return Err(ConfigError::ValidationFailed {
                    field: "pipeline.workers".to_string(),
                    message: format!("must be at most {MAX_WORKERS}"),
                });
            }
        }
        if config.dedup.prefix_chars == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "dedup.prefix_chars".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(cap) = config.scoring.max_context_multiplier {
            if !cap.is_finite() || cap < 1.0 {
                return Err(ConfigError::ValidationFailed {
                    field: "scoring.max_context_multiplier".to_string(),
                    message: "must be a finite number >= 1.0".to_string(),
                });
            }
        }
        if let Some(ref profile) = config.patterns.default_profile {
            if profile.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "patterns.default_profile".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.leadscore/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        dirs_path().map(|d| d.join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut LeadConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: LeadConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` value.
    fn merge(base: &mut LeadConfig, other: &LeadConfig) {
        // Pipeline
        if other.pipeline.min_text_length.is_some() {
            base.pipeline.min_text_length = other.pipeline.min_text_length;
        }
        if other.pipeline.max_comments.is_some() {
            base.pipeline.max_comments = other.pipeline.max_comments;
        }
        if other.pipeline.max_results.is_some() {
            base.pipeline.max_results = other.pipeline.max_results;
        }
        if other.pipeline.workers.is_some() {
            base.pipeline.workers = other.pipeline.workers;
        }

        // Dedup
        if other.dedup.prefix_chars.is_some() {
            base.dedup.prefix_chars = other.dedup.prefix_chars;
        }

        // Scoring
        if other.scoring.semantic_analysis_enabled.is_some() {
            base.scoring.semantic_analysis_enabled = other.scoring.semantic_analysis_enabled;
        }
        if other.scoring.max_context_multiplier.is_some() {
            base.scoring.max_context_multiplier = other.scoring.max_context_multiplier;
        }

        // Patterns
        if other.patterns.library_path.is_some() {
            base.patterns.library_path = other.patterns.library_path.clone();
        }
        if other.patterns.default_profile.is_some() {
            base.patterns.default_profile = other.patterns.default_profile.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `LEADSCORE_PIPELINE_WORKERS`, `LEADSCORE_DEDUP_PREFIX_CHARS`, etc.
    fn apply_env_overrides(config: &mut LeadConfig) {
        if let Ok(val) = std::env::var("LEADSCORE_PIPELINE_MIN_TEXT_LENGTH") {
            if let Ok(v) = val.parse::<usize>() {
                config.pipeline.min_text_length = Some(v);
            }
        }
        if let Ok(val) = std::env::var("LEADSCORE_PIPELINE_MAX_COMMENTS") {
            if let Ok(v) = val.parse::<usize>() {
                config.pipeline.max_comments = Some(v);
            }
        }
        if let Ok(val) = std::env::var("LEADSCORE_PIPELINE_MAX_RESULTS") {
            if let Ok(v) = val.parse::<usize>() {
                config.pipeline.max_results = Some(v);
            }
        }
        if let Ok(val) = std::env::var("LEADSCORE_PIPELINE_WORKERS") {
            if let Ok(v) = val.parse::<usize>() {
                config.pipeline.workers = Some(v);
            }
        }
        if let Ok(val) = std::env::var("LEADSCORE_DEDUP_PREFIX_CHARS") {
            if let Ok(v) = val.parse::<usize>() {
                config.dedup.prefix_chars = Some(v);
            }
        }
        if let Ok(val) = std::env::var("LEADSCORE_SCORING_SEMANTIC_ANALYSIS") {
            if let Ok(v) = val.parse::<bool>() {
                config.scoring.semantic_analysis_enabled = Some(v);
            }
        }
        if let Ok(val) = std::env::var("LEADSCORE_PATTERNS_LIBRARY_PATH") {
            config.patterns.library_path = Some(val);
        }
        if let Ok(val) = std::env::var("LEADSCORE_PATTERNS_DEFAULT_PROFILE") {
            config.patterns.default_profile = Some(val);
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut LeadConfig, cli: &CliOverrides) {
        if let Some(v) = cli.max_results {
            config.pipeline.max_results = Some(v);
        }
        if let Some(v) = cli.workers {
            config.pipeline.workers = Some(v);
        }
        if let Some(ref v) = cli.library_path {
            config.patterns.library_path = Some(v.clone());
        }
        if let Some(ref v) = cli.default_profile {
            config.patterns.default_profile = Some(v.clone());
        }
        if let Some(v) = cli.semantic_analysis_enabled {
            config.scoring.semantic_analysis_enabled = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Returns the user-level config directory: `~/.leadscore/`.
fn dirs_path() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".leadscore"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
