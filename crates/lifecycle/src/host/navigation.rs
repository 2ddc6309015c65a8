//! Navigation stack contract

use crate::error::LifecycleError;
use async_trait::async_trait;
use client_lifecycle_core::Route;
use serde_json::{Map, Value};

/// Route tree of the client shell
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Resolves once the navigation container is mounted and usable
    async fn ready(&self);

    /// Routes of the root stack, bottom first
    fn current_routes(&self) -> Vec<Route>;

    /// Merge `params` into the params of the route identified by `route_key`.
    /// A `null` value unsets that param.
    fn set_params(&self, params: Map<String, Value>, route_key: &str)
    -> Result<(), LifecycleError>;
}
