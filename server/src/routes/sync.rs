//! Sync and notification routes.

use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
    routing::{get, post},
    Json, Router,
};

use crate::handlers::websocket::handle_websocket_connection;
use crate::sync::SyncOutcome;
use crate::AppState;

/// Create sync routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sync", post(sync_handler))
        .route("/ws", get(ws_handler))
}

/// POST /sync - Run a sync cycle now.
async fn sync_handler(State(state): State<AppState>) -> Json<SyncOutcome> {
    Json(state.scheduler.run_once().await)
}

/// GET /ws - Upgrade to a notification socket.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| {
        handle_websocket_connection(socket, state.book, state.conn_manager)
    })
}
