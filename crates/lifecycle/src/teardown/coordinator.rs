//! Sign-out teardown coordinator

use super::network_state::NetworkStateView;
use super::pending::PendingErrors;
use super::preserve::PreservedKeySet;
use crate::context::LifecycleContext;
use crate::error::LifecycleError;
use crate::host::{Localizer, Navigator, NetworkOperation, NetworkSubsystems};
use client_lifecycle_core::{KeyValueStore, MicrosClock, SessionRecord, TeardownConfig, keys, store};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Signs the client out after its session became invalid.
pub struct SessionTeardown {
    store: Arc<dyn KeyValueStore>,
    network: Arc<dyn NetworkSubsystems>,
    navigator: Arc<dyn Navigator>,
    localizer: Arc<dyn Localizer>,
    network_state: NetworkStateView,
    clock: MicrosClock,
    pending: PendingErrors,
    /// Serializes deciding whether a sign-out starts a fresh error set
    admission: Mutex<()>,
    config: TeardownConfig,
}

impl SessionTeardown {
    pub fn new(
        ctx: &LifecycleContext,
        network_state: NetworkStateView,
        config: TeardownConfig,
    ) -> Self {
        Self {
            store: Arc::clone(&ctx.store),
            network: Arc::clone(&ctx.network),
            navigator: Arc::clone(&ctx.navigator),
            localizer: Arc::clone(&ctx.localizer),
            network_state,
            clock: MicrosClock::new(),
            pending: PendingErrors::default(),
            admission: Mutex::new(()),
            config,
        }
    }

    /// Tear the session down and leave the client on the sign-in screen.
    ///
    /// Network work is stopped (each step best-effort, in order) before the
    /// store is cleared. `error_message`, if any, is translated and kept with
    /// the errors of every other sign-out since the user last signed in; all
    /// of them are written to the session after the clear for the sign-in
    /// screen to show. Resetting the home route's params runs alongside and
    /// waits for navigation to be ready, so this does not return before the
    /// navigator is.
    ///
    /// Safe to call repeatedly and concurrently; failures are logged, never
    /// returned.
    pub async fn redirect_to_sign_in(&self, error_message: Option<&str>) {
        info!("Signing out");
        let sign_out = {
            let _admission = self.admission.lock().await;
            let sign_out = self.pending.begin(self.clock.now_micros());
            // Errors from before the user last signed in were already shown
            if self.session_signed_in().await {
                sign_out.discard_earlier();
            }
            sign_out
        };
        if let Some(message) = error_message.filter(|message| !message.is_empty()) {
            sign_out.record(self.localizer.translate(message));
        }

        tokio::join!(self.clear_session_state(), self.reset_home_route_params());
        info!("Sign-out complete");
    }

    /// Run [`Self::redirect_to_sign_in`] on a detached task.
    pub fn spawn_redirect_to_sign_in(
        self: &Arc<Self>,
        error_message: Option<String>,
    ) -> JoinHandle<()> {
        let teardown = Arc::clone(self);
        tokio::spawn(async move {
            teardown
                .redirect_to_sign_in(error_message.as_deref())
                .await
        })
    }

    /// Clear every param of the home route once navigation is ready.
    ///
    /// Does nothing when no route with the configured name is on the stack.
    pub async fn reset_home_route_params(&self) {
        self.navigator.ready().await;

        let routes = self.navigator.current_routes();
        let Some(home) = routes
            .iter()
            .find(|route| route.name == self.config.home_route)
        else {
            debug!("No {} route to reset", self.config.home_route);
            return;
        };

        if let Err(e) = self.navigator.set_params(home.cleared_params(), &home.key) {
            warn!("Failed to reset {} route params: {e}", self.config.home_route);
        }
    }

    async fn session_signed_in(&self) -> bool {
        match store::read::<SessionRecord>(self.store.as_ref(), keys::SESSION).await {
            Ok(session) => session.is_some_and(|session| session.is_signed_in()),
            Err(e) => {
                warn!("Failed to read session before sign-out: {e}");
                false
            }
        }
    }

    async fn clear_session_state(&self) {
        for operation in NetworkOperation::TEARDOWN_ORDER {
            debug!("Teardown: {}", operation.as_str());
            if let Err(e) = self.network.perform(operation).await {
                warn!("Teardown step {} failed: {e}", operation.as_str());
            }
        }

        let preserve = PreservedKeySet::for_sign_out(self.network_state.snapshot().as_ref());
        if let Err(e) = self.store.clear(preserve.as_slice()).await {
            warn!("Failed to clear store on sign-out: {e}");
            return;
        }
        debug!("Store cleared, kept {:?}", preserve.as_slice());

        let errors = self.pending.snapshot();
        if errors.is_empty() {
            return;
        }
        if let Err(e) = self.record_errors(&errors).await {
            warn!("Failed to record sign-out errors: {e}");
        }
    }

    async fn record_errors(&self, errors: &[(i64, String)]) -> Result<(), LifecycleError> {
        let patch = SessionRecord::errors_patch(
            errors
                .iter()
                .map(|(timestamp, message)| (*timestamp, message.as_str())),
        );
        self.store.merge(keys::SESSION, patch).await?;
        debug!("Recorded {} sign-out error(s)", errors.len());
        Ok(())
    }
}

impl std::fmt::Debug for SessionTeardown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTeardown")
            .field("config", &self.config)
            .field("network_state", &self.network_state.snapshot())
            .finish()
    }
}
