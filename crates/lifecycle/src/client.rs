//! Lifecycle facade wiring both coordinators to one host

use crate::context::LifecycleContext;
use crate::refresh::RefreshPolicy;
use crate::teardown::{NetworkStateMirror, NetworkStateView, SessionTeardown};
use client_lifecycle_core::LifecycleConfig;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Both lifecycle coordinators, sharing one [`LifecycleContext`].
///
/// Owns the connectivity mirror the teardown coordinator reads, so the mirror
/// lives exactly as long as the coordinators do.
#[derive(Debug)]
pub struct ClientLifecycle {
    refresh: Arc<RefreshPolicy>,
    teardown: Arc<SessionTeardown>,
    network_state: NetworkStateMirror,
}

impl ClientLifecycle {
    pub fn new(ctx: &LifecycleContext, config: &LifecycleConfig) -> Self {
        let network_state = NetworkStateMirror::attach(Arc::clone(&ctx.store));
        let teardown = SessionTeardown::new(ctx, network_state.view(), config.teardown.clone());
        Self {
            refresh: Arc::new(RefreshPolicy::new(ctx, config.refresh.clone())),
            teardown: Arc::new(teardown),
            network_state,
        }
    }

    /// Start the refresh policy. See [`RefreshPolicy::init`].
    pub async fn start(&self) -> JoinHandle<()> {
        self.refresh.init().await
    }

    /// Sign out in the background. See [`SessionTeardown::redirect_to_sign_in`].
    pub fn redirect_to_sign_in(&self, error_message: Option<&str>) -> JoinHandle<()> {
        self.teardown.spawn_redirect_to_sign_in(error_message.map(str::to_string))
    }

    pub fn refresh(&self) -> &Arc<RefreshPolicy> {
        &self.refresh
    }

    pub fn teardown(&self) -> &Arc<SessionTeardown> {
        &self.teardown
    }

    pub fn network_state(&self) -> NetworkStateView {
        self.network_state.view()
    }
}
