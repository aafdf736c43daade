//! System endpoints: health probe and service-wide totals.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::services::SystemOverview;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub uptime: u64,
}

/// `GET /api/health`
///
/// Liveness plus a database ping; 503 when the store is unreachable.
pub async fn get_health(State(state): State<Arc<AppState>>) -> Response {
    let database = state.store().ping().await.is_ok();

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ApiResponse::success(HealthResponse {
            status: if database { "ok" } else { "degraded" },
            database,
            uptime: state.start_time.elapsed().as_secs(),
        })),
    )
        .into_response()
}

/// `GET /api/system/overview`
///
/// Totals across users, catalogue entries, and recorded views.
pub async fn get_overview(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SystemOverview>>, ApiError> {
    let overview = state.stats_service().system_overview().await?;

    Ok(Json(ApiResponse::success(overview)))
}
