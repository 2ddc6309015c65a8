use client_lifecycle_core::StoreError;

/// Errors reported by collaborators and coordinator steps.
///
/// None of these cross the public coordinator operations: they are logged
/// where they occur and the operation carries on.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("remote command {command} failed: {message}")]
    Remote {
        command: &'static str,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("unexpected response to {command}: {message}")]
    InvalidResponse {
        command: &'static str,
        message: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("network subsystem {subsystem} failed: {message}")]
    Network {
        subsystem: &'static str,
        message: String,
    },

    #[error("navigation error: {message}")]
    Navigation { message: String },
}
