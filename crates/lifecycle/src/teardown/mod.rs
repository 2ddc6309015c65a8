//! Sign-out teardown
//!
//! When a session becomes invalid the client must stop all network work
//! before wiping durable state, so no late response can write into the
//! signed-out store. [`SessionTeardown`] runs that sequence; the keys that
//! survive it are computed by [`PreservedKeySet`] from the connectivity state
//! mirrored by [`NetworkStateMirror`].

mod coordinator;
mod network_state;
mod pending;
mod preserve;

pub use coordinator::SessionTeardown;
pub use network_state::{NetworkStateMirror, NetworkStateView};
pub use preserve::PreservedKeySet;
