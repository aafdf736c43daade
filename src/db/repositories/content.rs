use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use crate::domain::ContentKind;
use crate::entities::{content, prelude::*};

/// Descriptive fields for a content row about to be stored. This is the
/// single internal shape both the API create endpoint and confirmed
/// provider candidates are mapped into before touching the database.
#[derive(Debug, Clone)]
pub struct NewContent {
    pub title: String,
    pub original_title: Option<String>,
    pub description: Option<String>,
    pub kind: ContentKind,
    pub release_year: Option<i32>,
    pub imdb_rating: Option<f32>,
    pub imdb_id: Option<String>,
    pub poster_url: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub actors_cast: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
}

pub struct ContentRepository {
    conn: DatabaseConnection,
}

impl ContentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<content::Model>> {
        Content::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query content by id")
    }

    pub async fn get_by_imdb_id(&self, imdb_id: &str) -> Result<Option<content::Model>> {
        Content::find()
            .filter(content::Column::ImdbId.eq(imdb_id))
            .one(&self.conn)
            .await
            .context("Failed to query content by IMDb id")
    }

    /// Case-insensitive substring match against stored titles, first row in
    /// id order. A convenience hit for search aggregation, not an
    /// exhaustive lookup.
    pub async fn find_by_title_substring(&self, text: &str) -> Result<Option<content::Model>> {
        Content::find()
            .filter(content::Column::Title.contains(text))
            .order_by_asc(content::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query content by title")
    }

    /// Inserts a content row unless one already exists for the same IMDb
    /// id, in which case the existing row is returned untouched. Rows
    /// without an IMDb id are always inserted.
    pub async fn insert_if_absent(&self, fields: NewContent) -> Result<content::Model> {
        if let Some(imdb_id) = fields.imdb_id.as_deref()
            && let Some(existing) = self.get_by_imdb_id(imdb_id).await?
        {
            return Ok(existing);
        }

        let active_model = content::ActiveModel {
            title: Set(fields.title.clone()),
            original_title: Set(fields.original_title),
            description: Set(fields.description),
            content_type: Set(fields.kind.as_str().to_string()),
            release_year: Set(fields.release_year),
            imdb_rating: Set(fields.imdb_rating),
            imdb_id: Set(fields.imdb_id),
            poster_url: Set(fields.poster_url),
            genre: Set(fields.genre),
            director: Set(fields.director),
            actors_cast: Set(fields.actors_cast),
            language: Set(fields.language),
            country: Set(fields.country),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert content")?;

        info!("Stored content: {} (id {})", fields.title, model.id);
        Ok(model)
    }

    pub async fn count_all(&self) -> Result<u64> {
        Content::find()
            .count(&self.conn)
            .await
            .context("Failed to count content")
    }
}
