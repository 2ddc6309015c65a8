//! Navigation route snapshot

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of the navigation stack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Screen name (e.g. "Home")
    pub name: String,
    /// Unique key of this route instance
    pub key: String,
    /// Current route parameters, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
}

impl Route {
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            params: None,
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: Value) -> Self {
        self.params
            .get_or_insert_with(Map::new)
            .insert(name.into(), value);
        self
    }

    /// Params that reset every current param of this route to undefined.
    pub fn cleared_params(&self) -> Map<String, Value> {
        self.params
            .iter()
            .flat_map(|params| params.keys())
            .map(|name| (name.clone(), Value::Null))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cleared_params_nulls_every_key() {
        let route = Route::new("Home", "Home-1")
            .with_param("reportID", json!("123"))
            .with_param("exitTo", json!("/settings"));

        let cleared = route.cleared_params();
        assert_eq!(cleared.len(), 2);
        assert_eq!(cleared["reportID"], Value::Null);
        assert_eq!(cleared["exitTo"], Value::Null);
    }

    #[test]
    fn test_cleared_params_without_params() {
        let route = Route::new("Home", "Home-1");
        assert!(route.cleared_params().is_empty());
    }
}
