// HTTP handlers for operators: health and a read-only view of the session.

use axum::{extract::State, response::IntoResponse, Json};

use crate::server::AppState;

pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

/// Current roster, items and phase. Never mutates anything.
pub async fn state_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.view().await)
}
