//! Durable key-value store contract
//!
//! The lifecycle coordinators never touch storage directly. They go through
//! [`KeyValueStore`], which the hosting client implements over whatever
//! persistence it uses. [`MemoryStore`] is the in-process implementation used
//! by tests and by hosts without persistence.
//!
//! Values are JSON. Typed access goes through [`read`] and [`write`].

mod memory;
mod merge;

pub use memory::MemoryStore;
pub use merge::merge_value;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by store implementations
#[derive(Error, Debug)]
pub enum StoreError {
    /// A stored value did not match the expected shape, or a value could not
    /// be serialized
    #[error("JSON error for key {key}: {source}")]
    Json {
        key: String,
        source: serde_json::Error,
    },

    /// The backing storage rejected the operation
    #[error("Store unavailable: {message}")]
    Unavailable { message: String },
}

/// Identifies one registered change callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Change callback. Receives the new value, or `None` when the key was removed.
pub type StoreCallback = Arc<dyn Fn(Option<&Value>) + Send + Sync>;

/// Durable, observable mapping from key to JSON value.
///
/// Writes are last-write-wins; no transactions are offered or needed.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the value under `key`. Writing `null` removes the key.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Deep-merge `patch` into the value under `key` (see [`merge_value`]).
    async fn merge(&self, key: &str, patch: Value) -> Result<(), StoreError>;

    /// Reset every key to its initial value, except the keys in `preserve`,
    /// which keep their current value. Resolves once the reset is applied.
    async fn clear(&self, preserve: &[&str]) -> Result<(), StoreError>;

    /// Register `callback` for changes to `key`.
    ///
    /// The callback is invoked once immediately with the current value, then
    /// after every change.
    fn subscribe(&self, key: &str, callback: StoreCallback) -> SubscriptionId;

    /// Drop a previously registered callback. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Read and deserialize the value under `key`.
pub async fn read<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key).await? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| StoreError::Json {
                key: key.to_string(),
                source,
            }),
    }
}

/// Serialize `value` and store it under `key`.
pub async fn write<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(value).map_err(|source| StoreError::Json {
        key: key.to_string(),
        source,
    })?;
    store.set(key, value).await
}
