use axum::extract::{Path, State};

use crate::api::format::TypeEntry;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::rock_service::TYPE_NOT_FOUND;
use crate::state::AppState;

/// GET /types - All rock types in id order
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<TypeEntry>> {
    let types = state.store.list_types().await?;
    Ok(ApiResponse::success(types.into_iter().map(TypeEntry::from).collect()))
}

/// GET /types/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<TypeEntry> {
    let id: i64 = id.parse().map_err(|_| ApiError::not_found(TYPE_NOT_FOUND))?;

    let rock_type = state
        .store
        .find_type(id)
        .await?
        .ok_or_else(|| ApiError::not_found(TYPE_NOT_FOUND))?;
    Ok(ApiResponse::success(rock_type.into()))
}
