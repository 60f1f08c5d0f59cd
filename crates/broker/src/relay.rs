//! The cross-instance broadcast relay for throttle commands.

use async_trait::async_trait;
use mower_core::types::ThrottleCommand;
use tokio::sync::broadcast;

use crate::error::BrokerError;

/// Pub/sub relay that mirrors a published command to every subscribing
/// process, wherever it runs.
///
/// Delivery is best-effort: no per-client acknowledgment, no ordering
/// guarantee across distinct broadcasts. Workers hold the publish half;
/// each gateway holds a subscription it drains into its local WebSocket
/// connections.
#[async_trait]
pub trait ThrottleRelay: Send + Sync {
    /// Publish a command to all current subscribers on all instances.
    async fn publish(&self, cmd: ThrottleCommand) -> Result<(), BrokerError>;

    /// Subscribe to commands arriving at this process.
    fn subscribe(&self) -> broadcast::Receiver<ThrottleCommand>;

    /// Stop any background listener this relay runs. Default: no-op.
    fn shutdown(&self) {}
}
