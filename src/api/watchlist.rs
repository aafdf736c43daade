//! Watchlist endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Serialize;
use std::sync::Arc;

use super::{AddWatchlistRequest, ApiError, ApiResponse, AppState, WatchlistEntryDto};
use crate::api::history::HistoryQuery;
use crate::api::validation::{validate_content_id, validate_limit, validate_user_id};
use crate::constants::limits;
use crate::domain::{ContentId, UserId};
use crate::services::WatchlistError;

impl From<WatchlistError> for ApiError {
    fn from(err: WatchlistError) -> Self {
        match err {
            WatchlistError::AlreadyListed => Self::validation(err.to_string()),
            WatchlistError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClearedResponse {
    pub removed: u64,
}

/// `GET /api/v1/watchlist/user/{user_id}`
pub async fn get_user_watchlist(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<WatchlistEntryDto>>>, ApiError> {
    validate_user_id(user_id)?;
    let limit = validate_limit(query.limit.unwrap_or(limits::DEFAULT_PAGE_SIZE))?;
    let offset = query.offset.unwrap_or(0);

    let rows = state
        .watchlist_service()
        .list_for_user(UserId::new(user_id), offset, limit)
        .await?;

    let entries: Vec<WatchlistEntryDto> = rows
        .into_iter()
        .map(|(entry, content)| WatchlistEntryDto::from_pair(entry, content))
        .collect();

    Ok(Json(ApiResponse::success(entries)))
}

/// `POST /api/v1/watchlist`
///
/// Adds content to the user's watchlist; a second add of the same pair
/// is rejected as bad input, not treated as an update.
pub async fn add_entry(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddWatchlistRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WatchlistEntryDto>>), ApiError> {
    validate_user_id(request.user_id)?;
    validate_content_id(request.content_id)?;

    let entry = state
        .watchlist_service()
        .add(
            UserId::new(request.user_id),
            ContentId::new(request.content_id),
            request.notes,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(WatchlistEntryDto::from_pair(
            entry, None,
        ))),
    ))
}

/// `DELETE /api/v1/watchlist/{entry_id}`
pub async fn remove_entry(
    State(state): State<Arc<AppState>>,
    Path(entry_id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let removed = state.watchlist_service().remove(entry_id).await?;

    if !removed {
        return Err(ApiError::not_found("Watchlist entry", entry_id));
    }

    Ok(Json(ApiResponse::success(())))
}

/// `DELETE /api/v1/watchlist/user/{user_id}`
///
/// Clears the whole watchlist for one user.
pub async fn clear_user_watchlist(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<ClearedResponse>>, ApiError> {
    validate_user_id(user_id)?;

    let removed = state
        .watchlist_service()
        .clear(UserId::new(user_id))
        .await?;

    Ok(Json(ApiResponse::success(ClearedResponse { removed })))
}
