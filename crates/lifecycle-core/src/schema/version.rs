//! Build identifier

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a deployed client build.
///
/// Only equality is meaningful; hashes carry no ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionHash(String);

impl VersionHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Interpret a remote or stored JSON value as a version hash.
    ///
    /// `null`, non-string values, and the empty string all mean "no version".
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value.as_str() {
            Some(hash) if !hash.is_empty() => Some(Self(hash.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
