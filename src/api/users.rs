//! User endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, CreateUserRequest, UserDto};
use crate::api::validation::validate_account_id;
use crate::services::UserError;

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::DuplicateAccount(_) => Self::validation(err.to_string()),
            UserError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// `GET /api/v1/users/account/{account_id}`
///
/// Looks up a user by the external account id they registered with.
pub async fn get_by_account_id(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let account_id = validate_account_id(&account_id)?;

    let user = state
        .user_service()
        .get_by_account_id(account_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", account_id))?;

    Ok(Json(ApiResponse::success(user.into())))
}

/// `POST /api/v1/users`
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    validate_account_id(&request.account_id)?;

    let user = state.user_service().register(request.into()).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user.into()))))
}
