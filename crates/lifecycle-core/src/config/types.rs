//! Configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Stale-build refresh configuration
    #[serde(default)]
    pub refresh: RefreshConfig,
    /// Sign-out teardown configuration
    #[serde(default)]
    pub teardown: TeardownConfig,
}

/// Refresh policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between remote version checks (default: 1800 = 30 minutes)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Translation key of the "refresh now?" prompt
    #[serde(default = "default_prompt_key")]
    pub prompt_key: String,
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            prompt_key: default_prompt_key(),
        }
    }
}

/// Teardown configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeardownConfig {
    /// Name of the route whose params are reset on sign-out
    #[serde(default = "default_home_route")]
    pub home_route: String,
}

impl Default for TeardownConfig {
    fn default() -> Self {
        Self {
            home_route: default_home_route(),
        }
    }
}

fn default_interval_secs() -> u64 {
    1800 // 30 minutes
}

fn default_prompt_key() -> String {
    "refresh.prompt".to_string()
}

fn default_home_route() -> String {
    "Home".to_string()
}
