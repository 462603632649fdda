use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{LoginRequest, RegisterRequest, Session, UserService};
use crate::state::AppState;

/// POST /register - Create an account and receive a bearer token
///
/// Input: `{ "username", "password", "first_name", "last_name" }`
/// Output (201): `{ "valid": true, "token": "...", "id": 1 }`
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Session> {
    let Json(request) = payload.map_err(bad_body)?;

    let session = UserService::new(state.store.clone(), state.config.clone())
        .register(request)
        .await?;
    Ok(ApiResponse::created(session))
}

/// POST /login - Exchange username and password for a bearer token
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Session> {
    let Json(request) = payload.map_err(bad_body)?;

    let session = UserService::new(state.store.clone(), state.config.clone())
        .login(request)
        .await?;
    Ok(ApiResponse::success(session))
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    tracing::debug!("Rejected auth payload: {}", rejection.body_text());
    ApiError::bad_request(rejection.body_text())
}
