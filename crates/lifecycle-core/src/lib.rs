//! Core types and contracts for the client lifecycle coordinator
//!
//! This crate provides the pieces shared by the refresh policy and the
//! session teardown coordinator:
//! - Durable store keys and the schema of the values stored under them
//! - The [`store::KeyValueStore`] contract and an in-memory implementation
//! - Configuration loading, logging initialization, and a monotonic
//!   microsecond clock used to key session errors

pub mod clock;
pub mod config;
pub mod keys;
pub mod logging;
pub mod schema;
pub mod store;

pub use clock::MicrosClock;
pub use config::{LifecycleConfig, RefreshConfig, TeardownConfig};
pub use schema::{NetworkState, Route, SessionRecord, VersionHash};
pub use store::{KeyValueStore, MemoryStore, StoreError, SubscriptionId};

// Re-export for callers building route params and store values
pub use serde_json;
