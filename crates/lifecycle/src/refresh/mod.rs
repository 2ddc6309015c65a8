//! Stale-build detection and the reload policy built on it
//!
//! [`VersionPoller`] compares the build identifier recorded at startup with
//! the one the server reports and raises the durable refresh flag when they
//! differ. [`RefreshPolicy`] runs the poller on a recurring timer and, on
//! every visibility change, restarts that timer and decides whether to reload
//! silently (hidden) or ask the user (visible).

mod policy;
mod version;

pub use policy::RefreshPolicy;
pub use version::{VersionCheck, VersionPoller};
