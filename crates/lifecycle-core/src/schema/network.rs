//! Connectivity record

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Connectivity state as written by the network layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkState {
    /// Whether the client currently believes it is offline
    #[serde(default)]
    pub is_offline: bool,

    /// Whether the user pinned the client offline on purpose
    #[serde(default)]
    pub should_force_offline: bool,

    /// Unknown fields for forward compatibility
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl NetworkState {
    /// True when the client went offline on its own and the user did not
    /// force it. Only this state is carried across a sign-out.
    pub fn is_organically_offline(&self) -> bool {
        self.is_offline && !self.should_force_offline
    }
}
