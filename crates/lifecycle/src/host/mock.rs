//! Recording test doubles for the host collaborators
//!
//! All doubles can share one [`CallLog`], so a test can assert the relative
//! order of calls made to different collaborators (e.g. that every network
//! operation ran before the store was cleared).

use super::{
    ClientShell, NetworkOperation, NetworkSubsystems, Navigator, ReloadMode, RemoteCommand,
    RemoteCommandClient, TickTask, TimerHandle, TimerService,
};
use crate::error::LifecycleError;
use async_trait::async_trait;
use client_lifecycle_core::store::{StoreCallback, SubscriptionId};
use client_lifecycle_core::{KeyValueStore, MemoryStore, Route, StoreError};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Record of a collaborator call
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Invoke(RemoteCommand),
    ScheduleTimer { id: u64, interval: Duration },
    CancelTimer { id: u64 },
    Network(NetworkOperation),
    StoreGet(String),
    StoreSet(String, Value),
    StoreMerge(String, Value),
    StoreClear(Vec<String>),
    NavigationReady,
    SetParams { route_key: String, params: Map<String, Value> },
    Reload(ReloadMode),
    Confirm(String),
}

/// Shared, ordered call log
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<MockCall>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: MockCall) {
        self.0.lock().unwrap().push(call);
    }

    /// Get a copy of the log for assertions
    pub fn calls(&self) -> Vec<MockCall> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    /// Number of recorded calls matching `predicate`
    pub fn count(&self, predicate: impl Fn(&MockCall) -> bool) -> usize {
        self.0.lock().unwrap().iter().filter(|c| predicate(*c)).count()
    }

    /// Indices of recorded calls matching `predicate`
    pub fn positions(&self, predicate: impl Fn(&MockCall) -> bool) -> Vec<usize> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .enumerate()
            .filter(|(_, c)| predicate(*c))
            .map(|(i, _)| i)
            .collect()
    }
}

// ── Remote ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum RemoteBehavior {
    Respond(Value),
    Fail(String),
    /// Never resolves, like a request issued while offline
    Hang,
}

/// Remote client returning a configurable version hash
#[derive(Debug, Clone)]
pub struct MockRemote {
    behavior: Arc<Mutex<RemoteBehavior>>,
    log: CallLog,
}

impl MockRemote {
    pub fn new(log: CallLog) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(RemoteBehavior::Respond(Value::Null))),
            log,
        }
    }

    /// Respond to version requests with `hash`
    pub fn with_version(self, hash: &str) -> Self {
        self.set_version(hash);
        self
    }

    pub fn set_version(&self, hash: &str) {
        *self.behavior.lock().unwrap() = RemoteBehavior::Respond(Value::String(hash.to_string()));
    }

    /// Fail every invocation with `message`
    pub fn set_error(&self, message: &str) {
        *self.behavior.lock().unwrap() = RemoteBehavior::Fail(message.to_string());
    }

    /// Make every invocation hang forever
    pub fn set_hanging(&self) {
        *self.behavior.lock().unwrap() = RemoteBehavior::Hang;
    }

    pub fn invocation_count(&self) -> usize {
        self.log.count(|c| matches!(c, MockCall::Invoke(_)))
    }
}

#[async_trait]
impl RemoteCommandClient for MockRemote {
    async fn invoke(&self, command: RemoteCommand) -> Result<Value, LifecycleError> {
        self.log.push(MockCall::Invoke(command));
        let behavior = self.behavior.lock().unwrap().clone();
        match behavior {
            RemoteBehavior::Respond(value) => Ok(value),
            RemoteBehavior::Fail(message) => Err(LifecycleError::Remote {
                command: command.as_str(),
                message,
                source: None,
            }),
            RemoteBehavior::Hang => std::future::pending().await,
        }
    }
}

// ── Timers ───────────────────────────────────────────────────────────────────

/// Timer service that never ticks on its own; tests fire timers by hand
#[derive(Clone)]
pub struct MockTimerService {
    live: Arc<Mutex<BTreeMap<u64, (CancellationToken, TickTask)>>>,
    next_id: Arc<AtomicU64>,
    log: CallLog,
}

impl MockTimerService {
    pub fn new(log: CallLog) -> Self {
        Self {
            live: Arc::new(Mutex::new(BTreeMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            log,
        }
    }

    /// Ids of timers scheduled and not yet cancelled
    pub fn live_timers(&self) -> Vec<u64> {
        self.live.lock().unwrap().keys().copied().collect()
    }

    pub fn scheduled_count(&self) -> usize {
        self.log.count(|c| matches!(c, MockCall::ScheduleTimer { .. }))
    }

    /// Run one tick of every live timer and wait for the ticks to finish
    pub async fn fire_all(&self) {
        let tasks: Vec<TickTask> = self
            .live
            .lock()
            .unwrap()
            .values()
            .map(|(_, task)| Arc::clone(task))
            .collect();
        for task in tasks {
            task().await;
        }
    }
}

impl TimerService for MockTimerService {
    fn schedule(&self, interval: Duration, task: TickTask) -> TimerHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        self.live
            .lock()
            .unwrap()
            .insert(id, (token.clone(), task));
        self.log.push(MockCall::ScheduleTimer { id, interval });
        TimerHandle::new(id, token)
    }

    fn cancel(&self, handle: TimerHandle) {
        self.log.push(MockCall::CancelTimer { id: handle.id() });
        if let Some((token, _)) = self.live.lock().unwrap().remove(&handle.id()) {
            token.cancel();
        }
    }
}

// ── Network ──────────────────────────────────────────────────────────────────

/// Network layer that records operations and can fail selected ones
#[derive(Debug, Clone)]
pub struct MockNetwork {
    failing: Arc<Mutex<HashSet<NetworkOperation>>>,
    log: CallLog,
}

impl MockNetwork {
    pub fn new(log: CallLog) -> Self {
        Self {
            failing: Arc::new(Mutex::new(HashSet::new())),
            log,
        }
    }

    /// Make `operation` return an error (it is still recorded)
    pub fn fail_on(&self, operation: NetworkOperation) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn count(&self, operation: NetworkOperation) -> usize {
        self.log.count(|c| c == &MockCall::Network(operation))
    }

    fn record(&self, operation: NetworkOperation) -> Result<(), LifecycleError> {
        self.log.push(MockCall::Network(operation));
        if self.failing.lock().unwrap().contains(&operation) {
            return Err(LifecycleError::Network {
                subsystem: operation.as_str(),
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl NetworkSubsystems for MockNetwork {
    async fn clear_pending_queue(&self) -> Result<(), LifecycleError> {
        self.record(NetworkOperation::ClearPendingQueue)
    }

    async fn cancel_in_flight_requests(&self) -> Result<(), LifecycleError> {
        self.record(NetworkOperation::CancelInFlightRequests)
    }

    async fn clear_persisted_queue(&self) -> Result<(), LifecycleError> {
        self.record(NetworkOperation::ClearPersistedQueue)
    }

    async fn clear_reconnection_callbacks(&self) -> Result<(), LifecycleError> {
        self.record(NetworkOperation::ClearReconnectionCallbacks)
    }
}

// ── Navigation ───────────────────────────────────────────────────────────────

/// Navigation stack with a controllable readiness gate
#[derive(Debug, Clone)]
pub struct MockNavigator {
    routes: Arc<Mutex<Vec<Route>>>,
    ready: Arc<watch::Sender<bool>>,
    log: CallLog,
}

impl MockNavigator {
    /// Create a navigator that is already ready
    pub fn new(log: CallLog, routes: Vec<Route>) -> Self {
        let (ready, _) = watch::channel(true);
        Self {
            routes: Arc::new(Mutex::new(routes)),
            ready: Arc::new(ready),
            log,
        }
    }

    /// Create a navigator whose `ready()` blocks until [`Self::mark_ready`]
    pub fn not_ready(log: CallLog, routes: Vec<Route>) -> Self {
        let navigator = Self::new(log, routes);
        navigator.ready.send_replace(false);
        navigator
    }

    pub fn mark_ready(&self) {
        self.ready.send_replace(true);
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Navigator for MockNavigator {
    async fn ready(&self) {
        let mut rx = self.ready.subscribe();
        // The sender lives in self, so the channel cannot close here
        let _ = rx.wait_for(|ready| *ready).await;
        self.log.push(MockCall::NavigationReady);
    }

    fn current_routes(&self) -> Vec<Route> {
        self.routes()
    }

    fn set_params(
        &self,
        params: Map<String, Value>,
        route_key: &str,
    ) -> Result<(), LifecycleError> {
        self.log.push(MockCall::SetParams {
            route_key: route_key.to_string(),
            params: params.clone(),
        });

        let mut routes = self.routes.lock().unwrap();
        let route = routes
            .iter_mut()
            .find(|route| route.key == route_key)
            .ok_or_else(|| LifecycleError::Navigation {
                message: format!("no route with key '{route_key}'"),
            })?;
        let current = route.params.get_or_insert_with(Map::new);
        for (name, value) in params {
            if value.is_null() {
                current.remove(&name);
            } else {
                current.insert(name, value);
            }
        }
        Ok(())
    }
}

// ── Shell ────────────────────────────────────────────────────────────────────

/// Client shell that records reloads and answers prompts with a fixed reply
#[derive(Debug, Clone)]
pub struct MockShell {
    accept_prompts: Arc<AtomicBool>,
    log: CallLog,
}

impl MockShell {
    pub fn new(log: CallLog) -> Self {
        Self {
            accept_prompts: Arc::new(AtomicBool::new(false)),
            log,
        }
    }

    /// Answer every prompt with `accept`
    pub fn answering(self, accept: bool) -> Self {
        self.accept_prompts.store(accept, Ordering::SeqCst);
        self
    }

    pub fn reloads(&self) -> Vec<ReloadMode> {
        self.log
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                MockCall::Reload(mode) => Some(mode),
                _ => None,
            })
            .collect()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.log
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                MockCall::Confirm(message) => Some(message),
                _ => None,
            })
            .collect()
    }
}

impl ClientShell for MockShell {
    fn reload(&self, mode: ReloadMode) {
        self.log.push(MockCall::Reload(mode));
    }

    fn confirm(&self, message: &str) -> bool {
        self.log.push(MockCall::Confirm(message.to_string()));
        self.accept_prompts.load(Ordering::SeqCst)
    }
}

// ── Store ────────────────────────────────────────────────────────────────────

/// [`MemoryStore`] wrapper that records every operation
#[derive(Clone)]
pub struct RecordingStore {
    inner: Arc<MemoryStore>,
    fail_writes: Arc<AtomicBool>,
    log: CallLog,
}

impl RecordingStore {
    pub fn new(inner: Arc<MemoryStore>, log: CallLog) -> Self {
        Self {
            inner,
            fail_writes: Arc::new(AtomicBool::new(false)),
            log,
        }
    }

    /// The wrapped store, for direct inspection
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// Make set/merge/clear fail (they are still recorded)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                message: "injected write failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for RecordingStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.log.push(MockCall::StoreGet(key.to_string()));
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.log.push(MockCall::StoreSet(key.to_string(), value.clone()));
        self.check_writable()?;
        self.inner.set(key, value).await
    }

    async fn merge(&self, key: &str, patch: Value) -> Result<(), StoreError> {
        self.log.push(MockCall::StoreMerge(key.to_string(), patch.clone()));
        self.check_writable()?;
        self.inner.merge(key, patch).await
    }

    async fn clear(&self, preserve: &[&str]) -> Result<(), StoreError> {
        self.log.push(MockCall::StoreClear(
            preserve.iter().map(|key| key.to_string()).collect(),
        ));
        self.check_writable()?;
        self.inner.clear(preserve).await
    }

    fn subscribe(&self, key: &str, callback: StoreCallback) -> SubscriptionId {
        self.inner.subscribe(key, callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.unsubscribe(id)
    }
}
