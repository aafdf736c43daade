use chrono::{DateTime, Utc};

use super::ApiError;
use crate::constants::{history::EARLIEST_WATCH_DATE, limits};

pub fn validate_user_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid user ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_content_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid content ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_limit(limit: u64) -> Result<u64, ApiError> {
    if !(1..=limits::MAX_PAGE_SIZE).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {}. Limit must be between 1 and {}",
            limit,
            limits::MAX_PAGE_SIZE
        )));
    }
    Ok(limit)
}

pub fn validate_rating(rating: f32) -> Result<f32, ApiError> {
    if !(1.0..=10.0).contains(&rating) {
        return Err(ApiError::validation(format!(
            "Invalid rating: {}. Rating must be between 1 and 10",
            rating
        )));
    }
    Ok(rating)
}

/// Rejects watch dates from the future and dates before the service's
/// earliest plausible watch day. The accepted timestamp is canonicalized
/// to RFC3339 UTC, which is also the representation the duplicate-record
/// key compares on.
pub fn validate_watched_at(watched_at: DateTime<Utc>) -> Result<String, ApiError> {
    if watched_at > Utc::now() {
        return Err(ApiError::validation("Watch date cannot be in the future"));
    }

    if watched_at.to_rfc3339().as_str() < EARLIEST_WATCH_DATE {
        return Err(ApiError::validation(format!(
            "Watch date cannot be before {}",
            &EARLIEST_WATCH_DATE[..10]
        )));
    }

    Ok(watched_at.to_rfc3339())
}

pub fn validate_search_query(query: &str) -> Result<&str, ApiError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Search query cannot be empty"));
    }
    Ok(trimmed)
}

pub fn validate_account_id(account_id: &str) -> Result<&str, ApiError> {
    let trimmed = account_id.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Account ID cannot be empty"));
    }
    Ok(trimmed)
}
