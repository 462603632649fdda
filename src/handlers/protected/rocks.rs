use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use serde::Deserialize;

use crate::api::format::RockView;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::rock_service::ROCK_NOT_FOUND;
use crate::services::{CreateRock, ListScope, RockService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// `current` limits the listing to the caller's rocks
    pub owner: Option<String>,
}

/// POST /rocks - Create a rock owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    payload: Result<Json<CreateRock>, JsonRejection>,
) -> ApiResult<RockView> {
    // Malformed input is not a distinct error class for this resource
    let Json(input) = payload.map_err(|rejection| {
        tracing::warn!("Rejected rock payload from user {}: {}", caller.id, rejection.body_text());
        ApiError::internal()
    })?;

    let rock = RockService::new(state.store.clone()).create(input, &caller).await?;
    Ok(ApiResponse::created(rock))
}

/// GET /rocks[?owner=current] - List rocks, optionally only the caller's
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Vec<RockView>> {
    let Query(query) = query.map_err(|rejection| {
        tracing::warn!("Rejected rock query from user {}: {}", caller.id, rejection.body_text());
        ApiError::internal()
    })?;

    let scope = ListScope::from_owner_param(query.owner.as_deref());
    let rocks = RockService::new(state.store.clone()).list(scope, &caller).await?;
    Ok(ApiResponse::success(rocks))
}

/// DELETE /rocks/:id - Delete one of the caller's rocks
pub async fn destroy(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    // A non-numeric id cannot name any rock
    let id: i64 = id.parse().map_err(|_| ApiError::not_found(ROCK_NOT_FOUND))?;

    RockService::new(state.store.clone()).destroy(id, &caller).await?;
    Ok(ApiResponse::no_content())
}
