use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use super::AppState;

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// GET /ready - Readiness probe
/// Not ready while the relay would answer `failed-precondition`.
pub async fn ready(State(app_state): State<AppState>) -> impl IntoResponse {
    if app_state.notifier.is_some() {
        return (StatusCode::OK, Json(json!({"status": "ready"})));
    }

    tracing::warn!("Readiness check failed: Telegram credentials are not configured");
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "status": "not_ready",
            "reason": "telegram_not_configured"
        })),
    )
}
