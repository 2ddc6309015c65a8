//! Client lifecycle coordination
//!
//! Two cooperating coordinators for long-lived clients:
//!
//! - [`refresh`] notices when the running build is stale relative to the
//!   server and decides whether to reload silently or prompt the user.
//! - [`teardown`] sequences cancellation of network work and the clearing of
//!   durable state when a session becomes invalid, leaving the client signed
//!   out without stale writes landing afterwards.
//!
//! Everything the coordinators touch (store, transport, timers, navigation,
//! the client shell) is reached through the traits in [`host`], bundled in a
//! [`LifecycleContext`].

pub mod client;
pub mod context;
pub mod error;
pub mod host;
pub mod refresh;
pub mod teardown;

pub use client::ClientLifecycle;
pub use context::LifecycleContext;
pub use error::LifecycleError;
pub use refresh::{RefreshPolicy, VersionCheck, VersionPoller};
pub use teardown::{NetworkStateMirror, NetworkStateView, PreservedKeySet, SessionTeardown};
