use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use common::types::MessageBody;
use service::assets::Asset;
use service::storage::Document;

use crate::errors::ApiError;
use crate::extract::JsonObject;
use crate::routes::AppState;

/// Return the whole stored document.
pub async fn list_assets(State(state): State<AppState>) -> Result<Json<Document>, ApiError> {
    state
        .assets
        .list()
        .await
        .map(Json)
        .map_err(|e| ApiError::from_service(e, "GET /assets_master", "Failed to fetch assets"))
}

/// Append a new asset built from the request body.
pub async fn create_asset(
    State(state): State<AppState>,
    JsonObject(fields): JsonObject,
) -> Result<(StatusCode, Json<Asset>), ApiError> {
    state
        .assets
        .create(fields)
        .await
        .map(|asset| (StatusCode::CREATED, Json(asset)))
        .map_err(|e| ApiError::from_service(e, "POST /assets_master", "Failed to create asset"))
}

/// Replace every field of an asset except `id` and `created_at`.
pub async fn update_asset(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonObject(fields): JsonObject,
) -> Result<Json<Asset>, ApiError> {
    state
        .assets
        .update(&id, fields)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_service(e, "PUT /assets_master/:id", "Failed to update asset"))
}

pub async fn delete_asset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    state
        .assets
        .delete(&id)
        .await
        .map(|()| Json(MessageBody { message: "Asset deleted successfully" }))
        .map_err(|e| ApiError::from_service(e, "DELETE /assets_master/:id", "Failed to delete asset"))
}
