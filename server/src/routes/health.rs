//! Health check endpoint.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub quotes: usize,
    pub connections: usize,
    pub sync_enabled: bool,
    pub sync_running: bool,
}

/// Create health routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(root))
}

/// Health check handler.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let quotes = state.book.lock().await.store().len();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        quotes,
        connections: state.conn_manager.connection_count(),
        sync_enabled: state.config.sync.enabled,
        sync_running: state.scheduler.is_running(),
    })
}

/// Root handler.
async fn root() -> &'static str {
    "Quotebook Server"
}
