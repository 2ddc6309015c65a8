//! Configuration resolution
//!
//! Resolves configuration with priority:
//! 1. Environment variables
//! 2. Config file (TOML)
//! 3. Defaults

mod types;

pub use types::{LifecycleConfig, RefreshConfig, TeardownConfig};

use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value parsed but is not usable
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

impl LifecycleConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: LifecycleConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Resolve configuration: optional file, then environment overrides, then
    /// validation.
    ///
    /// A missing file falls back to defaults; a malformed file is an error.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.exists() => Self::load(path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Unparseable values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(secs) = std::env::var("LIFECYCLE_REFRESH_INTERVAL_SECS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
        {
            self.refresh.interval_secs = secs;
        }

        if let Ok(route) = std::env::var("LIFECYCLE_HOME_ROUTE") {
            self.teardown.home_route = route;
        }
    }

    /// Reject values the coordinators cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh.interval_secs == 0 {
            return Err(ConfigError::Invalid {
                message: "refresh.interval_secs must be at least 1".to_string(),
            });
        }
        if self.teardown.home_route.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "teardown.home_route cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}
