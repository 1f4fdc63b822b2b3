use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use tracing::warn;

use crate::error::HostLogError;
use crate::model::HostEvent;
use crate::routes::AppState;

/// Handler for POST /events/:name
///
/// The body is the event's bare payload; an empty body means none. The
/// event is dispatched and acknowledged without waiting for the log write.
pub async fn post_event(
    Path(name): Path<String>,
    State(state): State<AppState>,
    body: Bytes,
) -> impl IntoResponse {
    let payload = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        match serde_json::from_slice(&body) {
            Ok(payload) => payload,
            Err(e) => return rejected(StatusCode::BAD_REQUEST, &name, e),
        }
    };

    match HostEvent::from_parts(&name, payload) {
        Ok(event) => {
            state.subscriber.dispatch(&event);
            (
                StatusCode::ACCEPTED,
                Json(json!({ "status": "accepted", "event": name })),
            )
        }
        Err(e @ HostLogError::UnknownEvent(_)) => rejected(StatusCode::NOT_FOUND, &name, e),
        Err(e) => rejected(StatusCode::BAD_REQUEST, &name, e),
    }
}

fn rejected(
    status: StatusCode,
    name: &str,
    e: impl std::fmt::Display,
) -> (StatusCode, Json<Value>) {
    warn!("Rejected {} event: {}", name, e);
    (
        status,
        Json(json!({
            "status": "rejected",
            "event": name,
            "message": e.to_string()
        })),
    )
}
