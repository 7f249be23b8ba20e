//! Pattern library configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PROFILE;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PatternsConfig {
    /// Path to a TOML pattern library. The embedded sample library is used when unset.
    pub library_path: Option<String>,
    /// Profile used when a service description matches none. Default: "general".
    pub default_profile: Option<String>,
}

impl PatternsConfig {
    pub fn effective_default_profile(&self) -> &str {
        self.default_profile.as_deref().unwrap_or(DEFAULT_PROFILE)
    }
}
