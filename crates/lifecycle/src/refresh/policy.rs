//! Visibility-driven refresh policy

use super::version::{VersionCheck, VersionPoller};
use crate::context::LifecycleContext;
use crate::host::{
    ClientShell, Localizer, ReloadMode, TickFuture, TickTask, TimerHandle, TimerService,
    Visibility, VisibilitySource,
};
use client_lifecycle_core::{KeyValueStore, RefreshConfig, keys, store};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, warn};

/// Runs the version poller on a recurring timer and reacts to the client
/// moving between foreground and background.
pub struct RefreshPolicy {
    poller: Arc<VersionPoller>,
    store: Arc<dyn KeyValueStore>,
    timers: Arc<dyn TimerService>,
    visibility: Arc<dyn VisibilitySource>,
    shell: Arc<dyn ClientShell>,
    localizer: Arc<dyn Localizer>,
    config: RefreshConfig,
    /// The one live recurring check. Only touched inside `restart_timer`.
    timer: Mutex<Option<TimerHandle>>,
    /// Version check started by the latest visibility change
    last_check: Mutex<Option<AbortHandle>>,
}

impl RefreshPolicy {
    pub fn new(ctx: &LifecycleContext, config: RefreshConfig) -> Self {
        Self {
            poller: Arc::new(VersionPoller::from_context(ctx)),
            store: Arc::clone(&ctx.store),
            timers: Arc::clone(&ctx.timers),
            visibility: Arc::clone(&ctx.visibility),
            shell: Arc::clone(&ctx.shell),
            localizer: Arc::clone(&ctx.localizer),
            config,
            timer: Mutex::new(None),
            last_check: Mutex::new(None),
        }
    }

    /// Id of the live recurring timer, if one is scheduled
    pub fn active_timer(&self) -> Option<u64> {
        self.timer_slot().as_ref().map(TimerHandle::id)
    }

    /// Start the policy.
    ///
    /// The refresh flag is reset before this returns. Recording the build
    /// identifier runs in the background. The returned handle belongs to the
    /// visibility listener, which runs until the visibility source closes.
    pub async fn init(self: &Arc<Self>) -> JoinHandle<()> {
        if let Err(e) = store::write(self.store.as_ref(), keys::APP_SHOULD_REFRESH, &false).await
        {
            warn!("Failed to reset refresh flag: {e}");
        }

        let poller = Arc::clone(&self.poller);
        tokio::spawn(async move { poller.ensure_version_stored().await });

        self.restart_timer();

        let mut events = self.visibility.subscribe();
        let policy = Arc::clone(self);
        let listener = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(_) => policy.dispatch_visibility_change().await,
                    Err(RecvError::Lagged(missed)) => {
                        warn!("Visibility listener missed {missed} events");
                        policy.dispatch_visibility_change().await;
                    }
                    Err(RecvError::Closed) => {
                        debug!("Visibility source closed");
                        break;
                    }
                }
            }
        });

        info!(
            "Refresh policy started (interval {:?})",
            self.config.interval()
        );
        listener
    }

    /// Handle one visibility change event.
    ///
    /// Restarts the recurring check, starts an immediate check in the
    /// background, then acts on the current visibility. A check still running
    /// from the previous event is aborted. The returned handle resolves with
    /// the background check's outcome; dropping it is fine.
    ///
    /// A visible client waits on [`ClientShell::confirm`], which may block the
    /// calling thread. The visibility listener therefore calls this on the
    /// blocking pool; direct callers on an async worker should do the same.
    pub fn on_visibility_changed(&self) -> JoinHandle<VersionCheck> {
        self.restart_timer();

        let poller = Arc::clone(&self.poller);
        let check = tokio::spawn(async move { poller.check_remote_version().await });
        if let Some(previous) = self.check_slot().replace(check.abort_handle()) {
            previous.abort();
        }

        match self.visibility.current() {
            Visibility::Hidden => {
                info!("Client hidden, reloading");
                self.shell.reload(ReloadMode::Normal);
            }
            Visibility::Visible => {
                let prompt = self.localizer.translate(&self.config.prompt_key);
                if self.shell.confirm(&prompt) {
                    info!("Refresh accepted, forcing reload");
                    self.shell.reload(ReloadMode::Forced);
                } else {
                    debug!("Refresh declined");
                }
            }
            Visibility::Other => {}
        }

        check
    }

    async fn dispatch_visibility_change(self: &Arc<Self>) {
        let policy = Arc::clone(self);
        let handled = tokio::task::spawn_blocking(move || {
            policy.on_visibility_changed();
        });
        if let Err(e) = handled.await {
            warn!("Visibility change handler failed: {e}");
        }
    }

    /// Cancel the live timer (if any) and schedule its replacement, under one
    /// lock so no two timers are ever live at once.
    fn restart_timer(&self) {
        let mut slot = self.timer_slot();
        if let Some(previous) = slot.take() {
            self.timers.cancel(previous);
        }
        let handle = self.timers.schedule(self.config.interval(), self.tick_task());
        debug!("Refresh timer {} scheduled", handle.id());
        *slot = Some(handle);
    }

    fn tick_task(&self) -> TickTask {
        let poller = Arc::clone(&self.poller);
        Arc::new(move || -> TickFuture {
            let poller = Arc::clone(&poller);
            Box::pin(async move {
                poller.check_remote_version().await;
            })
        })
    }

    fn timer_slot(&self) -> MutexGuard<'_, Option<TimerHandle>> {
        self.timer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_slot(&self) -> MutexGuard<'_, Option<AbortHandle>> {
        self.last_check
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for RefreshPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshPolicy")
            .field("config", &self.config)
            .field("active_timer", &self.active_timer())
            .finish()
    }
}
