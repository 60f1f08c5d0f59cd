use std::sync::Arc;
use std::time::Duration;

use crate::ws::manager::WsManager;

/// Spawn a background task that sends a Ping frame to every connected
/// WebSocket client each `interval`.
///
/// The interval comes from [`GatewayConfig`](crate::config::GatewayConfig)
/// (`HEARTBEAT_INTERVAL_SECS`). The task runs until aborted during
/// shutdown; the returned `JoinHandle` is used for that.
pub fn start_heartbeat(ws_manager: Arc<WsManager>, interval: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);

        loop {
            ticker.tick().await;
            let count = ws_manager.connection_count().await;
            tracing::debug!(count, "WebSocket heartbeat ping");
            ws_manager.ping_all().await;
        }
    })
}
