//! Client shell primitives: reload, confirm prompt, translation

use std::collections::HashMap;

/// How a reload treats cached assets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadMode {
    /// Regular reload; cached assets may be reused
    Normal,
    /// Bypass caches and fetch the build from the server
    Forced,
}

/// Reload and prompt primitives of the hosting shell
pub trait ClientShell: Send + Sync {
    /// Restart the client. Typically does not return in a real shell.
    fn reload(&self, mode: ReloadMode);

    /// Show a yes/no prompt and return the user's answer.
    ///
    /// May block until the user answers. The refresh policy's visibility
    /// listener calls it from tokio's blocking pool, never on an async worker.
    fn confirm(&self, message: &str) -> bool;
}

/// Message translation
pub trait Localizer: Send + Sync {
    /// Translate `key`. Unknown keys are returned as-is.
    fn translate(&self, key: &str) -> String;
}

/// Localizer backed by a fixed key → message table
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    messages: HashMap<String, String>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.insert(key.into(), message.into());
        self
    }
}

impl Localizer for StaticCatalog {
    fn translate(&self, key: &str) -> String {
        self.messages
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_translates_known_key() {
        let catalog = StaticCatalog::new().with("refresh.prompt", "Refresh to update");
        assert_eq!(catalog.translate("refresh.prompt"), "Refresh to update");
    }

    #[test]
    fn test_catalog_falls_back_to_key() {
        let catalog = StaticCatalog::new();
        assert_eq!(catalog.translate("Session expired"), "Session expired");
    }
}
