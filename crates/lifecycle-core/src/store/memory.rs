//! In-memory store implementation

use super::{KeyValueStore, StoreCallback, StoreError, SubscriptionId, merge_value};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

struct Subscriber {
    id: SubscriptionId,
    key: String,
    callback: StoreCallback,
}

#[derive(Default)]
struct StoreState {
    values: HashMap<String, Value>,
    /// Values restored by `clear`
    defaults: HashMap<String, Value>,
    subscribers: Vec<Subscriber>,
}

/// Process-local [`KeyValueStore`].
///
/// Callbacks run on the writing task after the internal lock is released, so
/// a callback may read from (or write to) the store.
///
/// Clearing yields to the scheduler once before reporting completion, like a
/// backing store whose clear completes asynchronously.
pub struct MemoryStore {
    state: Mutex<StoreState>,
    next_id: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store with no initial values
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a store whose initial (and post-clear) values are `defaults`
    pub fn with_defaults<I, K>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let defaults: HashMap<String, Value> = defaults
            .into_iter()
            .map(|(key, value)| (key.into(), value))
            .collect();
        Self {
            state: Mutex::new(StoreState {
                values: defaults.clone(),
                defaults,
                subscribers: Vec::new(),
            }),
            next_id: AtomicU64::new(1),
        }
    }

    /// Synchronous read, for hosts and assertions
    pub fn peek(&self, key: &str) -> Option<Value> {
        self.lock().values.get(key).cloned()
    }

    /// Copy of every stored key and value
    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.lock().values.clone()
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Invoke callbacks for each changed key, outside the lock.
    fn notify(&self, changes: Vec<(String, Option<Value>)>) {
        if changes.is_empty() {
            return;
        }
        let pending: Vec<(StoreCallback, Option<Value>)> = {
            let state = self.lock();
            changes
                .iter()
                .flat_map(|(key, value)| {
                    state
                        .subscribers
                        .iter()
                        .filter(move |sub| &sub.key == key)
                        .map(move |sub| (sub.callback.clone(), value.clone()))
                })
                .collect()
        };
        for (callback, value) in pending {
            callback(value.as_ref());
        }
    }

    fn apply(&self, key: &str, next: Option<Value>) {
        let changed = {
            let mut state = self.lock();
            let previous = match &next {
                Some(value) => state.values.insert(key.to_string(), value.clone()),
                None => state.values.remove(key),
            };
            previous != next
        };
        if changed {
            self.notify(vec![(key.to_string(), next)]);
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("MemoryStore")
            .field("keys", &state.values.len())
            .field("subscribers", &state.subscribers.len())
            .finish()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.peek(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let next = if value.is_null() { None } else { Some(value) };
        self.apply(key, next);
        Ok(())
    }

    async fn merge(&self, key: &str, patch: Value) -> Result<(), StoreError> {
        let mut merged = self.peek(key).unwrap_or(Value::Null);
        merge_value(&mut merged, patch);
        let next = if merged.is_null() { None } else { Some(merged) };
        self.apply(key, next);
        Ok(())
    }

    async fn clear(&self, preserve: &[&str]) -> Result<(), StoreError> {
        let changes = {
            let mut state = self.lock();
            let mut next = state.defaults.clone();
            for key in preserve {
                match state.values.get(*key) {
                    Some(value) => {
                        next.insert((*key).to_string(), value.clone());
                    }
                    None => {
                        next.remove(*key);
                    }
                }
            }

            let touched: HashSet<String> =
                state.values.keys().chain(next.keys()).cloned().collect();
            let changes: Vec<(String, Option<Value>)> = touched
                .into_iter()
                .filter(|key| state.values.get(key) != next.get(key))
                .map(|key| {
                    let value = next.get(&key).cloned();
                    (key, value)
                })
                .collect();

            state.values = next;
            changes
        };
        debug!(
            "Store cleared ({} preserved, {} changed)",
            preserve.len(),
            changes.len()
        );
        self.notify(changes);
        tokio::task::yield_now().await;
        Ok(())
    }

    fn subscribe(&self, key: &str, callback: StoreCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let current = {
            let mut state = self.lock();
            state.subscribers.push(Subscriber {
                id,
                key: key.to_string(),
                callback: callback.clone(),
            });
            state.values.get(key).cloned()
        };
        callback(current.as_ref());
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.lock().subscribers.retain(|sub| sub.id != id);
    }
}
