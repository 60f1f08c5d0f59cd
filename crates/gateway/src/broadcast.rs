//! Relay-to-client broadcast bridge.

use std::sync::Arc;

use axum::extract::ws::Message;
use mower_core::types::ThrottleCommand;
use tokio::sync::broadcast;

use crate::protocol::processed_image_text;
use crate::ws::WsManager;

/// Pushes every throttle command arriving on the relay subscription to all
/// locally connected WebSocket clients as a `processedImage` event.
///
/// One broadcaster runs per gateway process; the relay mirrors commands
/// across processes, so every client on every instance sees every command.
pub struct ThrottleBroadcaster {
    ws_manager: Arc<WsManager>,
}

impl ThrottleBroadcaster {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the bridge loop.
    ///
    /// Exits when the relay subscription closes (i.e. the relay was shut
    /// down). Lagging only skips commands — delivery is best-effort.
    pub async fn run(self, mut receiver: broadcast::Receiver<ThrottleCommand>) {
        loop {
            match receiver.recv().await {
                Ok(cmd) => {
                    tracing::debug!(name = %cmd.name, "Broadcasting throttle command");
                    let msg = Message::Text(processed_image_text(&cmd).into());
                    self.ws_manager.broadcast(msg).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Throttle broadcaster lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Relay closed, throttle broadcaster shutting down");
                    break;
                }
            }
        }
    }
}
