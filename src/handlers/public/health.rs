use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - Service identity
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Rock API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": "/register, /login (public)",
            "rocks": "/rocks[/:id] (protected)",
            "types": "/types[/:id] (protected)",
            "health": "/health (public)",
        }
    }))
}

/// GET /health - 200 when the record store answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "timestamp": now })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "timestamp": now })),
            )
        }
    }
}
