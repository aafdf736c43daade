use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::info;

use crate::entities::{content, prelude::*, watchlist};

/// Fields for a new watchlist entry.
#[derive(Debug, Clone)]
pub struct NewWatchlistEntry {
    pub user_id: i32,
    pub content_id: i32,
    pub notes: Option<String>,
}

pub struct WatchlistRepository {
    conn: DatabaseConnection,
}

impl WatchlistRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_pair(
        &self,
        user_id: i32,
        content_id: i32,
    ) -> Result<Option<watchlist::Model>> {
        Watchlist::find()
            .filter(watchlist::Column::UserId.eq(user_id))
            .filter(watchlist::Column::ContentId.eq(content_id))
            .one(&self.conn)
            .await
            .context("Failed to query watchlist entry by pair")
    }

    pub async fn insert(&self, entry: NewWatchlistEntry) -> Result<watchlist::Model> {
        let active_model = watchlist::ActiveModel {
            user_id: Set(entry.user_id),
            content_id: Set(entry.content_id),
            added_at: Set(chrono::Utc::now().to_rfc3339()),
            notes: Set(entry.notes),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert watchlist entry")?;

        info!(
            "Added content {} to watchlist of user {}",
            entry.content_id, entry.user_id
        );
        Ok(model)
    }

    pub async fn delete_by_id(&self, id: i32) -> Result<bool> {
        let result = Watchlist::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete watchlist entry")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete_all_for_user(&self, user_id: i32) -> Result<u64> {
        let result = Watchlist::delete_many()
            .filter(watchlist::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await
            .context("Failed to clear watchlist")?;

        info!(
            "Cleared watchlist for user {} ({} entries)",
            user_id, result.rows_affected
        );
        Ok(result.rows_affected)
    }

    pub async fn list_for_user_with_content(
        &self,
        user_id: i32,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<(watchlist::Model, Option<content::Model>)>> {
        Watchlist::find()
            .filter(watchlist::Column::UserId.eq(user_id))
            .find_also_related(Content)
            .order_by_desc(watchlist::Column::AddedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to list watchlist")
    }
}
