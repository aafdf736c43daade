//! View history endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, HistoryEntryDto, RecordViewRequest, ViewRecordDto};
use crate::api::validation::{
    validate_content_id, validate_limit, validate_rating, validate_user_id, validate_watched_at,
};
use crate::constants::limits;
use crate::db::ViewRecordPatch;
use crate::domain::{ContentId, UserId};

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

/// `POST /api/v1/history`
///
/// Records a watch event. Reporting the same (user, content, watched-at)
/// triple again merges the supplied fields into the existing record
/// instead of failing, so the response is the surviving row either way.
pub async fn record_view(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecordViewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ViewRecordDto>>), ApiError> {
    validate_user_id(request.user_id)?;
    validate_content_id(request.content_id)?;
    let user_id = UserId::new(request.user_id);
    let content_id = ContentId::new(request.content_id);
    let watched_at = validate_watched_at(request.watched_at)?;

    if let Some(rating) = request.rating {
        validate_rating(rating)?;
    }

    let details = ViewRecordPatch {
        rating: request.rating,
        duration_watched: request.duration_watched,
        rewatch: request.rewatch,
        notes: request.notes,
    };

    let model = state
        .view_recorder()
        .record(user_id, content_id, watched_at, details)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(model.into())),
    ))
}

/// `GET /api/v1/history/user/{user_id}`
///
/// The user's history, newest watch first, joined with content.
pub async fn get_user_history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<HistoryEntryDto>>>, ApiError> {
    validate_user_id(user_id)?;
    let limit = validate_limit(query.limit.unwrap_or(limits::DEFAULT_PAGE_SIZE))?;
    let offset = query.offset.unwrap_or(0);

    let rows = state
        .view_recorder()
        .list_for_user(UserId::new(user_id), offset, limit)
        .await?;

    let entries: Vec<HistoryEntryDto> = rows
        .into_iter()
        .map(|(record, content)| HistoryEntryDto::from_pair(record, content))
        .collect();

    Ok(Json(ApiResponse::success(entries)))
}

/// `GET /api/v1/history/user/{user_id}/stats`
pub async fn get_user_stats(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<super::UserStatsDto>>, ApiError> {
    validate_user_id(user_id)?;

    let stats = state
        .stats_service()
        .user_stats(UserId::new(user_id))
        .await?;

    Ok(Json(ApiResponse::success(stats.into())))
}
