//! Remote command client contract

use crate::error::LifecycleError;
use async_trait::async_trait;
use serde_json::Value;

/// Named server commands issued by the coordinators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteCommand {
    /// Returns the build identifier currently deployed on the server
    GetVersionHash,
}

impl RemoteCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteCommand::GetVersionHash => "GetVersionHash",
        }
    }
}

/// Issues named remote operations.
///
/// While the client is offline an invocation may never resolve. Callers must
/// not rely on it completing.
#[async_trait]
pub trait RemoteCommandClient: Send + Sync {
    async fn invoke(&self, command: RemoteCommand) -> Result<Value, LifecycleError>;
}
