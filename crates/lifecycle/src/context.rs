use crate::host::{
    ClientShell, Localizer, Navigator, NetworkSubsystems, RemoteCommandClient, TimerService,
    VisibilitySource,
};
use client_lifecycle_core::KeyValueStore;
use std::sync::Arc;

/// Host services the coordinators run against
#[derive(Clone)]
pub struct LifecycleContext {
    /// Durable store shared with the rest of the client
    pub store: Arc<dyn KeyValueStore>,
    /// Remote command client (used for the version check)
    pub remote: Arc<dyn RemoteCommandClient>,
    /// Foreground/background signal
    pub visibility: Arc<dyn VisibilitySource>,
    /// Recurring timer service
    pub timers: Arc<dyn TimerService>,
    /// Request queues and transport of the network layer
    pub network: Arc<dyn NetworkSubsystems>,
    /// Navigation stack
    pub navigator: Arc<dyn Navigator>,
    /// Reload and prompt primitives of the client shell
    pub shell: Arc<dyn ClientShell>,
    /// Message translation
    pub localizer: Arc<dyn Localizer>,
}
