//! Aggregate numbers over the catalogue and view history.

use anyhow::Result;
use serde::Serialize;

use crate::db::{Store, UserViewStats};
use crate::domain::UserId;

#[derive(Debug, Clone, Serialize)]
pub struct SystemOverview {
    pub total_users: u64,
    pub total_content: u64,
    pub total_views: u64,
}

pub struct StatsService {
    store: Store,
}

impl StatsService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Viewing totals for one user. Counts split by content kind only
    /// cover views whose content row still exists.
    pub async fn user_stats(&self, user_id: UserId) -> Result<UserViewStats> {
        self.store.user_view_stats(user_id.value()).await
    }

    pub async fn system_overview(&self) -> Result<SystemOverview> {
        let (total_users, total_content, total_views) = tokio::join!(
            self.store.count_users(),
            self.store.count_content(),
            self.store.count_view_records()
        );

        Ok(SystemOverview {
            total_users: total_users?,
            total_content: total_content?,
            total_views: total_views?,
        })
    }
}
