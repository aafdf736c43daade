use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{content, users, view_history, watchlist};

pub mod migrator;
pub mod repositories;

pub use repositories::content::NewContent;
pub use repositories::user::NewUser;
pub use repositories::view_history::{
    NewViewRecord, UserViewStats, ViewInsert, ViewRecordKey, ViewRecordPatch,
};
pub use repositories::watchlist::NewWatchlistEntry;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn content_repo(&self) -> repositories::content::ContentRepository {
        repositories::content::ContentRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn view_history_repo(&self) -> repositories::view_history::ViewHistoryRepository {
        repositories::view_history::ViewHistoryRepository::new(self.conn.clone())
    }

    fn watchlist_repo(&self) -> repositories::watchlist::WatchlistRepository {
        repositories::watchlist::WatchlistRepository::new(self.conn.clone())
    }

    pub async fn get_content(&self, id: i32) -> Result<Option<content::Model>> {
        self.content_repo().get_by_id(id).await
    }

    pub async fn get_content_by_imdb_id(&self, imdb_id: &str) -> Result<Option<content::Model>> {
        self.content_repo().get_by_imdb_id(imdb_id).await
    }

    pub async fn find_content_by_title(&self, text: &str) -> Result<Option<content::Model>> {
        self.content_repo().find_by_title_substring(text).await
    }

    pub async fn insert_content_if_absent(&self, fields: NewContent) -> Result<content::Model> {
        self.content_repo().insert_if_absent(fields).await
    }

    pub async fn count_content(&self) -> Result<u64> {
        self.content_repo().count_all().await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<users::Model>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_account_id(&self, account_id: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_by_account_id(account_id).await
    }

    pub async fn create_user(&self, fields: NewUser) -> Result<users::Model> {
        self.user_repo().create(fields).await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count_all().await
    }

    pub async fn insert_view_record(&self, record: NewViewRecord) -> Result<ViewInsert> {
        self.view_history_repo().insert(record).await
    }

    pub async fn find_view_record_by_key(
        &self,
        key: &ViewRecordKey,
    ) -> Result<Option<view_history::Model>> {
        self.view_history_repo().find_by_key(key).await
    }

    pub async fn patch_view_record(
        &self,
        existing: view_history::Model,
        patch: ViewRecordPatch,
    ) -> Result<view_history::Model> {
        self.view_history_repo().apply_patch(existing, patch).await
    }

    pub async fn list_user_history(
        &self,
        user_id: i32,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<(view_history::Model, Option<content::Model>)>> {
        self.view_history_repo()
            .list_for_user_with_content(user_id, offset, limit)
            .await
    }

    pub async fn user_view_stats(&self, user_id: i32) -> Result<UserViewStats> {
        self.view_history_repo().user_stats(user_id).await
    }

    pub async fn count_view_records(&self) -> Result<u64> {
        self.view_history_repo().count_all().await
    }

    pub async fn find_watchlist_entry(
        &self,
        user_id: i32,
        content_id: i32,
    ) -> Result<Option<watchlist::Model>> {
        self.watchlist_repo().find_by_pair(user_id, content_id).await
    }

    pub async fn add_watchlist_entry(&self, entry: NewWatchlistEntry) -> Result<watchlist::Model> {
        self.watchlist_repo().insert(entry).await
    }

    pub async fn delete_watchlist_entry(&self, id: i32) -> Result<bool> {
        self.watchlist_repo().delete_by_id(id).await
    }

    pub async fn clear_watchlist(&self, user_id: i32) -> Result<u64> {
        self.watchlist_repo().delete_all_for_user(user_id).await
    }

    pub async fn list_user_watchlist(
        &self,
        user_id: i32,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<(watchlist::Model, Option<content::Model>)>> {
        self.watchlist_repo()
            .list_for_user_with_content(user_id, offset, limit)
            .await
    }
}
