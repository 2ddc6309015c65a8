//! Read-only mirror of the connectivity record

use client_lifecycle_core::store::StoreCallback;
use client_lifecycle_core::{KeyValueStore, NetworkState, SubscriptionId, keys};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Latest connectivity record seen in the store.
///
/// Cheap to clone; every clone observes the same mirror.
#[derive(Debug, Clone)]
pub struct NetworkStateView {
    rx: watch::Receiver<Option<NetworkState>>,
}

impl NetworkStateView {
    /// A view pinned to `state`, for hosts that track connectivity elsewhere
    pub fn fixed(state: Option<NetworkState>) -> Self {
        let (_, rx) = watch::channel(state);
        Self { rx }
    }

    /// The last observed record, `None` if none was ever seen
    pub fn snapshot(&self) -> Option<NetworkState> {
        self.rx.borrow().clone()
    }
}

/// Keeps a [`NetworkStateView`] in sync with the store's connectivity record.
///
/// The subscription is dropped with the mirror.
pub struct NetworkStateMirror {
    store: Arc<dyn KeyValueStore>,
    subscription: SubscriptionId,
    view: NetworkStateView,
}

impl NetworkStateMirror {
    /// Subscribe to the connectivity record. The view holds the current
    /// value as soon as this returns.
    pub fn attach(store: Arc<dyn KeyValueStore>) -> Self {
        let (tx, rx) = watch::channel(None);
        let callback: StoreCallback = Arc::new(move |value: Option<&Value>| {
            // A removed record leaves the last snapshot in place
            let Some(value) = value else {
                return;
            };
            match serde_json::from_value::<NetworkState>(value.clone()) {
                Ok(state) => {
                    tx.send_replace(Some(state));
                }
                Err(e) => debug!("Ignoring malformed {} record: {e}", keys::NETWORK),
            }
        });
        let subscription = store.subscribe(keys::NETWORK, callback);

        Self {
            store,
            subscription,
            view: NetworkStateView { rx },
        }
    }

    pub fn view(&self) -> NetworkStateView {
        self.view.clone()
    }
}

impl Drop for NetworkStateMirror {
    fn drop(&mut self) {
        self.store.unsubscribe(self.subscription);
    }
}

impl std::fmt::Debug for NetworkStateMirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkStateMirror")
            .field("subscription", &self.subscription)
            .field("current", &self.view.snapshot())
            .finish()
    }
}
