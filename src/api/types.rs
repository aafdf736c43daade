use serde::{Deserialize, Serialize};

use crate::db::{NewContent, NewUser};
use crate::domain::ContentKind;
use crate::entities::{content, users, view_history, watchlist};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContentDto {
    pub id: i32,
    pub title: String,
    pub original_title: Option<String>,
    pub description: Option<String>,
    pub content_type: ContentKind,
    pub release_year: Option<i32>,
    pub imdb_rating: Option<f32>,
    pub imdb_id: Option<String>,
    pub poster_url: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub created_at: String,
}

impl From<content::Model> for ContentDto {
    fn from(model: content::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            original_title: model.original_title,
            description: model.description,
            content_type: ContentKind::from_provider_type(&model.content_type),
            release_year: model.release_year,
            imdb_rating: model.imdb_rating,
            imdb_id: model.imdb_id,
            poster_url: model.poster_url,
            genre: model.genre,
            director: model.director,
            cast: model.actors_cast,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateContentRequest {
    pub title: String,
    pub original_title: Option<String>,
    pub description: Option<String>,
    pub content_type: ContentKind,
    pub release_year: Option<i32>,
    pub imdb_rating: Option<f32>,
    pub imdb_id: Option<String>,
    pub poster_url: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
}

impl From<CreateContentRequest> for NewContent {
    fn from(req: CreateContentRequest) -> Self {
        Self {
            title: req.title,
            original_title: req.original_title,
            description: req.description,
            kind: req.content_type,
            release_year: req.release_year,
            imdb_rating: req.imdb_rating,
            imdb_id: req.imdb_id,
            poster_url: req.poster_url,
            genre: req.genre,
            director: req.director,
            actors_cast: req.cast,
            language: None,
            country: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub account_id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: String,
}

impl From<users::Model> for UserDto {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            account_id: model.account_id,
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub account_id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            account_id: req.account_id,
            username: req.username,
            first_name: req.first_name,
            last_name: req.last_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecordViewRequest {
    pub user_id: i32,
    pub content_id: i32,
    /// RFC3339; canonicalized to UTC before storage.
    pub watched_at: chrono::DateTime<chrono::Utc>,
    pub rating: Option<f32>,
    pub duration_watched: Option<i32>,
    pub rewatch: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ViewRecordDto {
    pub id: i32,
    pub user_id: i32,
    pub content_id: i32,
    pub watched_at: String,
    pub rating: Option<f32>,
    pub duration_watched: Option<i32>,
    pub rewatch: bool,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<view_history::Model> for ViewRecordDto {
    fn from(model: view_history::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            content_id: model.content_id,
            watched_at: model.watched_at,
            rating: model.rating,
            duration_watched: model.duration_watched,
            rewatch: model.rewatch,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// A history row joined with its content. `content` is absent when the
/// content row was deleted after the view was recorded.
#[derive(Debug, Serialize)]
pub struct HistoryEntryDto {
    pub id: i32,
    pub user_id: i32,
    pub content_id: i32,
    pub watched_at: String,
    pub rating: Option<f32>,
    pub duration_watched: Option<i32>,
    pub rewatch: bool,
    pub notes: Option<String>,
    pub created_at: String,
    pub content_title: Option<String>,
    pub content_type: Option<ContentKind>,
    pub content: Option<ContentDto>,
}

impl HistoryEntryDto {
    #[must_use]
    pub fn from_pair(record: view_history::Model, content: Option<content::Model>) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            content_id: record.content_id,
            watched_at: record.watched_at,
            rating: record.rating,
            duration_watched: record.duration_watched,
            rewatch: record.rewatch,
            notes: record.notes,
            created_at: record.created_at,
            content_title: content.as_ref().map(|c| c.title.clone()),
            content_type: content
                .as_ref()
                .map(|c| ContentKind::from_provider_type(&c.content_type)),
            content: content.map(ContentDto::from),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserStatsDto {
    pub total_views: u64,
    pub movies_views: u64,
    pub series_views: u64,
    pub average_rating: f64,
    pub recent_views_30_days: u64,
}

impl From<crate::db::UserViewStats> for UserStatsDto {
    fn from(stats: crate::db::UserViewStats) -> Self {
        Self {
            total_views: stats.total_views,
            movies_views: stats.movies_views,
            series_views: stats.series_views,
            average_rating: stats.average_rating,
            recent_views_30_days: stats.recent_views_30_days,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddWatchlistRequest {
    pub user_id: i32,
    pub content_id: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WatchlistEntryDto {
    pub id: i32,
    pub user_id: i32,
    pub content_id: i32,
    pub added_at: String,
    pub notes: Option<String>,
    pub content_title: Option<String>,
    pub content_type: Option<ContentKind>,
    pub content: Option<ContentDto>,
}

impl WatchlistEntryDto {
    #[must_use]
    pub fn from_pair(entry: watchlist::Model, content: Option<content::Model>) -> Self {
        Self {
            id: entry.id,
            user_id: entry.user_id,
            content_id: entry.content_id,
            added_at: entry.added_at,
            notes: entry.notes,
            content_title: content.as_ref().map(|c| c.title.clone()),
            content_type: content
                .as_ref()
                .map(|c| ContentKind::from_provider_type(&c.content_type)),
            content: content.map(ContentDto::from),
        }
    }
}
