//! Per-user watchlist management.

use thiserror::Error;
use tracing::info;

use crate::db::{NewWatchlistEntry, Store};
use crate::domain::{ContentId, UserId};
use crate::entities::{content, watchlist};

#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("Content already in watchlist")]
    AlreadyListed,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for WatchlistError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

pub struct WatchlistService {
    store: Store,
}

impl WatchlistService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Adds content to a user's watchlist, rejecting a second add of the
    /// same pair. The table's unique index backs the check, so a lost
    /// race surfaces as a database error rather than a silent duplicate.
    pub async fn add(
        &self,
        user_id: UserId,
        content_id: ContentId,
        notes: Option<String>,
    ) -> Result<watchlist::Model, WatchlistError> {
        if self
            .store
            .find_watchlist_entry(user_id.value(), content_id.value())
            .await?
            .is_some()
        {
            return Err(WatchlistError::AlreadyListed);
        }

        let created = self
            .store
            .add_watchlist_entry(NewWatchlistEntry {
                user_id: user_id.value(),
                content_id: content_id.value(),
                notes,
            })
            .await?;

        info!(
            "Watchlist entry {} added for user {}",
            created.id, created.user_id
        );

        Ok(created)
    }

    /// Removes one entry by its id. `false` means no such entry existed.
    pub async fn remove(&self, entry_id: i32) -> Result<bool, WatchlistError> {
        Ok(self.store.delete_watchlist_entry(entry_id).await?)
    }

    /// Empties a user's watchlist and reports how many entries went away.
    pub async fn clear(&self, user_id: UserId) -> Result<u64, WatchlistError> {
        let removed = self.store.clear_watchlist(user_id.value()).await?;

        info!("Cleared {} watchlist entries for user {}", removed, user_id);

        Ok(removed)
    }

    pub async fn list_for_user(
        &self,
        user_id: UserId,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<(watchlist::Model, Option<content::Model>)>, WatchlistError> {
        Ok(self
            .store
            .list_user_watchlist(user_id.value(), offset, limit)
            .await?)
    }
}
