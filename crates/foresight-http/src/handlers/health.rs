//! Health endpoint.

use crate::state::AppState;
use axum::extract::State;
use axum::response::Json;

/// GET /health - service metadata and uptime.
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "foresight-server",
        "version": env!("CARGO_PKG_VERSION"),
        "uptimeSeconds": state.started_at.elapsed().as_secs(),
        "timestamp": chrono::Utc::now(),
    }))
}
