use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::routes::AppState;

/// Handler for GET /health
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let entries = state.logger.read().await.map(|logs| logs.len());
    let status = if entries.is_ok() { "ok" } else { "degraded" };
    (
        StatusCode::OK,
        Json(json!({
            "status": status,
            "service": "hostlog",
            "version": env!("CARGO_PKG_VERSION"),
            "storage": state.storage.to_string(),
            "entries": entries.ok(),
            "handlers": state.subscriber.registered().len(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}

/// Handler for GET /ready - ready while the log writer is running
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.logger.flush().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unavailable",
                "message": e.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
        ),
    }
}
