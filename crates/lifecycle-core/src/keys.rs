//! Durable store keys
//!
//! Every value the coordinators read or write lives under one of these keys.
//! The string values match the keys used by existing client deployments, so
//! they must not change.

/// Build identifier recorded when the client first talked to the server
pub const APP_VERSION_HASH: &str = "appVersionHash";

/// Set when a newer build has been confirmed on the server
pub const APP_SHOULD_REFRESH: &str = "app_shouldRefresh";

/// Connectivity record (`{isOffline, shouldForceOffline}`)
pub const NETWORK: &str = "network";

/// Session record carrying the auth token and sign-in errors
pub const SESSION: &str = "session";

/// User locale preference
pub const NVP_PREFERRED_LOCALE: &str = "nvp_preferredLocale";

/// Registry of client instances sharing the store
pub const ACTIVE_CLIENTS: &str = "activeClients";

/// Stable identifier of this device
pub const DEVICE_ID: &str = "deviceID";

/// Keys that always survive a sign-out clear.
pub const ALWAYS_PRESERVED: [&str; 3] = [NVP_PREFERRED_LOCALE, ACTIVE_CLIENTS, DEVICE_ID];
