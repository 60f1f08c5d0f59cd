use std::sync::Arc;

use mower_broker::JobQueue;

use crate::config::GatewayConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; inner data is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<GatewayConfig>,
    /// WebSocket connection manager.
    pub ws_manager: Arc<WsManager>,
    /// Producer half of the capture job queue.
    pub queue: Arc<dyn JobQueue>,
}
