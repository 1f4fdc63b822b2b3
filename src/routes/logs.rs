use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::log::LogEntry;
use crate::routes::AppState;

fn logs_body(logs: &[LogEntry]) -> serde_json::Value {
    if logs.is_empty() {
        json!({
            "status": "empty",
            "message": "No logs to see.",
            "logs": [],
            "count": 0
        })
    } else {
        json!({
            "status": "ok",
            "logs": logs,
            "count": logs.len()
        })
    }
}

fn error_body(action: &str, e: impl std::fmt::Display) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "status": "error",
            "message": format!("Failed to {}: {}", action, e),
            "logs": []
        })),
    )
}

/// Handler for GET /logs
pub async fn get_logs(State(state): State<AppState>) -> impl IntoResponse {
    match state.logger.read().await {
        Ok(logs) => (StatusCode::OK, Json(logs_body(&logs))),
        Err(e) => error_body("retrieve logs", e),
    }
}

/// Handler for POST /logs/clear. Responds with the refreshed list.
pub async fn clear_logs(State(state): State<AppState>) -> impl IntoResponse {
    if let Err(e) = state.logger.clear().await {
        return error_body("clear logs", e);
    }
    match state.logger.read().await {
        Ok(logs) => (StatusCode::OK, Json(logs_body(&logs))),
        Err(e) => error_body("retrieve logs", e),
    }
}
