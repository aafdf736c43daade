//! Combined search endpoint.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::api::validation::validate_search_query;
use crate::domain::{ContentKind, SearchSource};
use crate::services::SearchOutcome;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub kind: Option<String>,
}

/// `GET /api/v1/search?query=&kind=`
///
/// Answers from the stored catalogue and the metadata provider combined.
/// An empty combined result is a 404 carrying the outcome's message; a
/// provider outage alone never fails the request.
pub async fn search_content(
    State(state): State<Arc<AppState>>,
    Query(request): Query<SearchRequest>,
) -> Result<Json<ApiResponse<SearchOutcome>>, ApiError> {
    let query = validate_search_query(&request.query)?;

    let kind_hint = match request.kind.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(ContentKind::parse(raw).ok_or_else(|| {
            ApiError::validation(format!(
                "Invalid kind: '{}'. Expected 'movie' or 'series'",
                raw
            ))
        })?),
    };

    let outcome = state.search_service().search(query, kind_hint).await?;

    if outcome.source == SearchSource::NotFound {
        return Err(ApiError::NotFound(outcome.message));
    }

    Ok(Json(ApiResponse::success(outcome)))
}
