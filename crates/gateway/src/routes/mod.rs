pub mod health;

use axum::routing::any;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the route tree.
///
/// ```text
/// /health    liveness check
/// /ws        WebSocket upgrade
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .route("/ws", any(ws::ws_handler))
}
