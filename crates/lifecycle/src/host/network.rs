//! Network layer contract used during teardown

use crate::error::LifecycleError;
use async_trait::async_trait;

/// One cancel/clear operation on the network layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkOperation {
    /// Drop queued requests that were never sent
    ClearPendingQueue,
    /// Abort requests currently on the wire
    CancelInFlightRequests,
    /// Drop requests persisted for retry on reconnect
    ClearPersistedQueue,
    /// Forget callbacks registered to run on reconnect
    ClearReconnectionCallbacks,
}

impl NetworkOperation {
    /// Order in which sign-out teardown runs the operations
    pub const TEARDOWN_ORDER: [NetworkOperation; 4] = [
        NetworkOperation::ClearPendingQueue,
        NetworkOperation::CancelInFlightRequests,
        NetworkOperation::ClearPersistedQueue,
        NetworkOperation::ClearReconnectionCallbacks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkOperation::ClearPendingQueue => "pending_queue",
            NetworkOperation::CancelInFlightRequests => "in_flight_requests",
            NetworkOperation::ClearPersistedQueue => "persisted_queue",
            NetworkOperation::ClearReconnectionCallbacks => "reconnection_callbacks",
        }
    }
}

/// Request queues, transport, and reconnection registry of the network layer.
///
/// Cancellation is best-effort: a response that arrives after its request was
/// canceled must be discarded by the implementation.
#[async_trait]
pub trait NetworkSubsystems: Send + Sync {
    async fn clear_pending_queue(&self) -> Result<(), LifecycleError>;

    async fn cancel_in_flight_requests(&self) -> Result<(), LifecycleError>;

    async fn clear_persisted_queue(&self) -> Result<(), LifecycleError>;

    async fn clear_reconnection_callbacks(&self) -> Result<(), LifecycleError>;

    /// Dispatch a single operation by name
    async fn perform(&self, operation: NetworkOperation) -> Result<(), LifecycleError> {
        match operation {
            NetworkOperation::ClearPendingQueue => self.clear_pending_queue().await,
            NetworkOperation::CancelInFlightRequests => self.cancel_in_flight_requests().await,
            NetworkOperation::ClearPersistedQueue => self.clear_persisted_queue().await,
            NetworkOperation::ClearReconnectionCallbacks => {
                self.clear_reconnection_callbacks().await
            }
        }
    }
}
