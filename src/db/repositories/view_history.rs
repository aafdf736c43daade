use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, SqlErr,
};
use tracing::info;

use crate::domain::ContentKind;
use crate::entities::{content, prelude::*, view_history};

/// Fields for a view record about to be inserted. `watched_at` is RFC3339
/// UTC, validated and canonicalized by the caller before it gets here.
#[derive(Debug, Clone)]
pub struct NewViewRecord {
    pub user_id: i32,
    pub content_id: i32,
    pub watched_at: String,
    pub rating: Option<f32>,
    pub duration_watched: Option<i32>,
    pub rewatch: Option<bool>,
    pub notes: Option<String>,
}

/// The unique key a duplicate insert collided on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRecordKey {
    pub user_id: i32,
    pub content_id: i32,
    pub watched_at: String,
}

/// Outcome of an attempted insert. A duplicate of the known
/// (user, content, watched_at) key comes back as `Conflict` so the caller
/// can reconcile it into an update; violations of any other constraint
/// stay errors.
#[derive(Debug)]
pub enum ViewInsert {
    Created(view_history::Model),
    Conflict(ViewRecordKey),
}

/// Partial overwrite for an existing record. `None` leaves the stored
/// value untouched.
#[derive(Debug, Clone, Default)]
pub struct ViewRecordPatch {
    pub rating: Option<f32>,
    pub duration_watched: Option<i32>,
    pub rewatch: Option<bool>,
    pub notes: Option<String>,
}

/// Per-user viewing totals.
#[derive(Debug, Clone, PartialEq)]
pub struct UserViewStats {
    pub total_views: u64,
    pub movies_views: u64,
    pub series_views: u64,
    pub average_rating: f64,
    pub recent_views_30_days: u64,
}

pub struct ViewHistoryRepository {
    conn: DatabaseConnection,
}

impl ViewHistoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Attempts the insert directly and classifies the failure afterwards,
    /// instead of pre-checking for an existing row. Under concurrent
    /// submissions of the same triple the unique index is the only
    /// reliable arbiter; a pre-check would race.
    pub async fn insert(&self, record: NewViewRecord) -> Result<ViewInsert> {
        let now = chrono::Utc::now().to_rfc3339();

        let active_model = view_history::ActiveModel {
            user_id: Set(record.user_id),
            content_id: Set(record.content_id),
            watched_at: Set(record.watched_at.clone()),
            rating: Set(record.rating),
            duration_watched: Set(record.duration_watched),
            rewatch: Set(record.rewatch.unwrap_or(false)),
            notes: Set(record.notes.clone()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        match active_model.insert(&self.conn).await {
            Ok(model) => {
                info!("Recorded view for user {}", record.user_id);
                Ok(ViewInsert::Created(model))
            }
            Err(err) => match err.sql_err() {
                // Only the record key's own constraint is reconciled.
                // SQLite names the violated columns in the message, so a
                // unique failure mentioning watched_at can only be ours.
                Some(SqlErr::UniqueConstraintViolation(message))
                    if message.contains("view_history.watched_at") =>
                {
                    Ok(ViewInsert::Conflict(ViewRecordKey {
                        user_id: record.user_id,
                        content_id: record.content_id,
                        watched_at: record.watched_at,
                    }))
                }
                _ => Err(err).context("Failed to insert view record"),
            },
        }
    }

    pub async fn find_by_key(&self, key: &ViewRecordKey) -> Result<Option<view_history::Model>> {
        ViewHistory::find()
            .filter(view_history::Column::UserId.eq(key.user_id))
            .filter(view_history::Column::ContentId.eq(key.content_id))
            .filter(view_history::Column::WatchedAt.eq(key.watched_at.as_str()))
            .one(&self.conn)
            .await
            .context("Failed to query view record by key")
    }

    pub async fn apply_patch(
        &self,
        existing: view_history::Model,
        patch: ViewRecordPatch,
    ) -> Result<view_history::Model> {
        let user_id = existing.user_id;
        let mut active: view_history::ActiveModel = existing.into();

        if let Some(rating) = patch.rating {
            active.rating = Set(Some(rating));
        }
        if let Some(duration) = patch.duration_watched {
            active.duration_watched = Set(Some(duration));
        }
        if let Some(rewatch) = patch.rewatch {
            active.rewatch = Set(rewatch);
        }
        if let Some(notes) = patch.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update view record")?;

        info!("Updated existing view record for user {}", user_id);
        Ok(model)
    }

    pub async fn list_for_user_with_content(
        &self,
        user_id: i32,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<(view_history::Model, Option<content::Model>)>> {
        ViewHistory::find()
            .filter(view_history::Column::UserId.eq(user_id))
            .find_also_related(Content)
            .order_by_desc(view_history::Column::WatchedAt)
            .order_by_desc(view_history::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to list view history")
    }

    #[allow(clippy::cast_precision_loss)]
    pub async fn user_stats(&self, user_id: i32) -> Result<UserViewStats> {
        let total_views = ViewHistory::find()
            .filter(view_history::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await
            .context("Failed to count views")?;

        let movies_views = self.count_views_of_kind(user_id, ContentKind::Movie).await?;
        let series_views = self.count_views_of_kind(user_id, ContentKind::Series).await?;

        let ratings: Vec<f32> = ViewHistory::find()
            .select_only()
            .column(view_history::Column::Rating)
            .filter(view_history::Column::UserId.eq(user_id))
            .filter(view_history::Column::Rating.is_not_null())
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to fetch ratings")?;

        let average_rating = if ratings.is_empty() {
            0.0
        } else {
            let sum: f64 = ratings.iter().copied().map(f64::from).sum();
            let avg = sum / ratings.len() as f64;
            (avg * 100.0).round() / 100.0
        };

        let threshold = chrono::Utc::now()
            .checked_sub_signed(chrono::Duration::days(
                crate::constants::history::RECENT_WINDOW_DAYS,
            ))
            .map_or_else(|| "1970-01-01T00:00:00Z".to_string(), |t| t.to_rfc3339());

        let recent_views_30_days = ViewHistory::find()
            .filter(view_history::Column::UserId.eq(user_id))
            .filter(view_history::Column::WatchedAt.gte(threshold))
            .count(&self.conn)
            .await
            .context("Failed to count recent views")?;

        Ok(UserViewStats {
            total_views,
            movies_views,
            series_views,
            average_rating,
            recent_views_30_days,
        })
    }

    async fn count_views_of_kind(&self, user_id: i32, kind: ContentKind) -> Result<u64> {
        ViewHistory::find()
            .filter(view_history::Column::UserId.eq(user_id))
            .join(JoinType::InnerJoin, view_history::Relation::Content.def())
            .filter(content::Column::ContentType.eq(kind.as_str()))
            .count(&self.conn)
            .await
            .context("Failed to count views by kind")
    }

    pub async fn count_all(&self) -> Result<u64> {
        ViewHistory::find()
            .count(&self.conn)
            .await
            .context("Failed to count view records")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewContent, NewUser, Store};

    async fn seeded_store() -> (Store, i32, i32) {
        let store = Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .expect("in-memory store");

        let user = store
            .create_user(NewUser {
                account_id: "7".to_string(),
                username: None,
                first_name: None,
                last_name: None,
            })
            .await
            .unwrap();

        let content = store
            .insert_content_if_absent(NewContent {
                title: "Severance".to_string(),
                original_title: None,
                description: None,
                kind: ContentKind::Series,
                release_year: Some(2022),
                imdb_rating: None,
                imdb_id: Some("tt11280740".to_string()),
                poster_url: None,
                genre: None,
                director: None,
                actors_cast: None,
                language: None,
                country: None,
            })
            .await
            .unwrap();

        (store, user.id, content.id)
    }

    fn record(user_id: i32, content_id: i32, watched_at: &str) -> NewViewRecord {
        NewViewRecord {
            user_id,
            content_id,
            watched_at: watched_at.to_string(),
            rating: None,
            duration_watched: None,
            rewatch: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn second_insert_of_same_triple_is_tagged_conflict() {
        let (store, user_id, content_id) = seeded_store().await;
        let repo = ViewHistoryRepository::new(store.conn.clone());
        let watched_at = "2024-05-10T21:00:00+00:00";

        let first = repo.insert(record(user_id, content_id, watched_at)).await.unwrap();
        assert!(matches!(first, ViewInsert::Created(_)));

        let second = repo.insert(record(user_id, content_id, watched_at)).await.unwrap();
        match second {
            ViewInsert::Conflict(key) => {
                assert_eq!(key.user_id, user_id);
                assert_eq!(key.content_id, content_id);
                assert_eq!(key.watched_at, watched_at);
            }
            ViewInsert::Created(_) => panic!("duplicate triple must not insert"),
        }

        assert_eq!(repo.count_all().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn conflict_key_finds_the_existing_row() {
        let (store, user_id, content_id) = seeded_store().await;
        let repo = ViewHistoryRepository::new(store.conn.clone());
        let watched_at = "2024-05-10T21:00:00+00:00";

        repo.insert(record(user_id, content_id, watched_at)).await.unwrap();

        let key = ViewRecordKey {
            user_id,
            content_id,
            watched_at: watched_at.to_string(),
        };
        let found = repo.find_by_key(&key).await.unwrap();
        assert!(found.is_some());

        let miss = repo
            .find_by_key(&ViewRecordKey {
                watched_at: "2024-05-11T21:00:00+00:00".to_string(),
                ..key
            })
            .await
            .unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn stats_split_by_kind_and_round_ratings() {
        let (store, user_id, series_id) = seeded_store().await;

        let movie = store
            .insert_content_if_absent(NewContent {
                title: "Dune".to_string(),
                original_title: None,
                description: None,
                kind: ContentKind::Movie,
                release_year: Some(2021),
                imdb_rating: None,
                imdb_id: Some("tt1160419".to_string()),
                poster_url: None,
                genre: None,
                director: None,
                actors_cast: None,
                language: None,
                country: None,
            })
            .await
            .unwrap();

        let repo = ViewHistoryRepository::new(store.conn.clone());

        let mut watched = record(user_id, series_id, "2024-05-10T21:00:00+00:00");
        watched.rating = Some(7.0);
        repo.insert(watched).await.unwrap();

        let mut watched = record(user_id, movie.id, "2024-05-11T21:00:00+00:00");
        watched.rating = Some(8.5);
        repo.insert(watched).await.unwrap();

        // Unrated view; must not drag the average down.
        repo.insert(record(user_id, movie.id, "2024-05-12T21:00:00+00:00"))
            .await
            .unwrap();

        let stats = repo.user_stats(user_id).await.unwrap();
        assert_eq!(stats.total_views, 3);
        assert_eq!(stats.movies_views, 2);
        assert_eq!(stats.series_views, 1);
        assert!((stats.average_rating - 7.75).abs() < 1e-9);
    }
}
