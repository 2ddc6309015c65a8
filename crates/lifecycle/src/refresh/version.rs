//! Version poller

use crate::context::LifecycleContext;
use crate::error::LifecycleError;
use crate::host::{RemoteCommand, RemoteCommandClient};
use client_lifecycle_core::{KeyValueStore, VersionHash, keys, store};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of one remote version check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionCheck {
    /// Remote build matches the recorded one
    UpToDate,
    /// Remote build differs; the refresh flag was raised
    Stale {
        stored: Option<VersionHash>,
        remote: VersionHash,
    },
    /// The check could not complete; nothing was changed
    Failed,
}

/// Compares the recorded build identifier against the server's.
pub struct VersionPoller {
    store: Arc<dyn KeyValueStore>,
    remote: Arc<dyn RemoteCommandClient>,
}

impl VersionPoller {
    pub fn new(store: Arc<dyn KeyValueStore>, remote: Arc<dyn RemoteCommandClient>) -> Self {
        Self { store, remote }
    }

    pub fn from_context(ctx: &LifecycleContext) -> Self {
        Self::new(Arc::clone(&ctx.store), Arc::clone(&ctx.remote))
    }

    /// Record the server's build identifier if none is recorded yet.
    ///
    /// Never overwrites a recorded value. Failures are logged and dropped.
    pub async fn ensure_version_stored(&self) {
        match self.try_ensure_version_stored().await {
            Ok(Some(hash)) => info!("Recorded client version {}", hash),
            Ok(None) => debug!("Client version already recorded"),
            Err(e) => warn!("Failed to record client version: {e}"),
        }
    }

    async fn try_ensure_version_stored(&self) -> Result<Option<VersionHash>, LifecycleError> {
        if self.stored_version().await?.is_some() {
            return Ok(None);
        }
        let remote = self.remote_version().await?;
        store::write(self.store.as_ref(), keys::APP_VERSION_HASH, &remote).await?;
        Ok(Some(remote))
    }

    /// Ask the server for its build identifier and compare.
    ///
    /// Issues the request even when a version is recorded and even while
    /// offline; an offline request may never resolve, which is harmless
    /// because a check that never completes never raises the flag.
    ///
    /// On mismatch the refresh flag is raised and the recorded identifier is
    /// left as is, so every later check keeps reporting the build as stale
    /// until the client actually reloads.
    pub async fn check_remote_version(&self) -> VersionCheck {
        match self.try_check_remote_version().await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Remote version check failed: {e}");
                VersionCheck::Failed
            }
        }
    }

    async fn try_check_remote_version(&self) -> Result<VersionCheck, LifecycleError> {
        let stored = self.stored_version().await?;
        let remote = self.remote_version().await?;

        if stored.as_ref() == Some(&remote) {
            debug!("Client version {} is current", remote);
            return Ok(VersionCheck::UpToDate);
        }

        info!(
            "Client version is stale (recorded: {}, remote: {})",
            stored.as_ref().map(VersionHash::as_str).unwrap_or("<none>"),
            remote
        );
        store::write(self.store.as_ref(), keys::APP_SHOULD_REFRESH, &true).await?;
        Ok(VersionCheck::Stale { stored, remote })
    }

    async fn stored_version(&self) -> Result<Option<VersionHash>, LifecycleError> {
        let value = self.store.get(keys::APP_VERSION_HASH).await?;
        Ok(value.as_ref().and_then(VersionHash::from_value))
    }

    /// An empty or non-string reply is rejected rather than compared, so a
    /// malformed response can never raise the refresh flag.
    async fn remote_version(&self) -> Result<VersionHash, LifecycleError> {
        let command = RemoteCommand::GetVersionHash;
        let value = self.remote.invoke(command).await?;
        VersionHash::from_value(&value).ok_or_else(|| LifecycleError::InvalidResponse {
            command: command.as_str(),
            message: format!("expected a non-empty version string, got {value}"),
        })
    }
}
