//! Content catalogue endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, ContentDto, CreateContentRequest};
use crate::api::validation::validate_content_id;
use crate::domain::ContentId;

/// `GET /api/v1/content/{content_id}`
pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Path(content_id): Path<i32>,
) -> Result<Json<ApiResponse<ContentDto>>, ApiError> {
    validate_content_id(content_id)?;

    let model = state
        .content_service()
        .get(ContentId::new(content_id))
        .await?
        .ok_or_else(|| ApiError::not_found("Content", content_id))?;

    Ok(Json(ApiResponse::success(model.into())))
}

/// `GET /api/v1/content/imdb/{imdb_id}`
///
/// Looks up stored content by its IMDb id.
pub async fn get_by_imdb_id(
    State(state): State<Arc<AppState>>,
    Path(imdb_id): Path<String>,
) -> Result<Json<ApiResponse<ContentDto>>, ApiError> {
    let model = state
        .content_service()
        .get_by_imdb_id(&imdb_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Content", &imdb_id))?;

    Ok(Json(ApiResponse::success(model.into())))
}

/// `POST /api/v1/content`
///
/// Registers content. A known IMDb id returns the already-stored row
/// rather than a duplicate.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateContentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ContentDto>>), ApiError> {
    if request.title.trim().is_empty() {
        return Err(ApiError::validation("Title cannot be empty"));
    }

    let model = state.content_service().register(request.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(model.into())),
    ))
}
