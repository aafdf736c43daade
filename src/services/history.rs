//! Watch event recording with duplicate merging.
//!
//! The history table carries a uniqueness guarantee on (user, content,
//! watched-at). Rather than bouncing a duplicate back to the caller, a
//! second report of the same watch merges into the first: fields the
//! caller supplied overwrite, fields left out survive.

use anyhow::Result;
use tracing::info;

use crate::db::{NewViewRecord, Store, ViewInsert, ViewRecordPatch};
use crate::domain::{ContentId, UserId};
use crate::entities::{content, view_history};

pub struct ViewRecorder {
    store: Store,
}

impl ViewRecorder {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Records a watch event, merging into the existing row when the same
    /// (user, content, watched-at) triple was already recorded.
    ///
    /// The merge only touches fields present in `details`; a duplicate
    /// report without a rating keeps the rating already stored. Any
    /// constraint failure other than the triple collision propagates.
    pub async fn record(
        &self,
        user_id: UserId,
        content_id: ContentId,
        watched_at: String,
        details: ViewRecordPatch,
    ) -> Result<view_history::Model> {
        let record = NewViewRecord {
            user_id: user_id.value(),
            content_id: content_id.value(),
            watched_at,
            rating: details.rating,
            duration_watched: details.duration_watched,
            rewatch: details.rewatch,
            notes: details.notes.clone(),
        };

        match self.store.insert_view_record(record).await? {
            ViewInsert::Created(model) => Ok(model),
            ViewInsert::Conflict(key) => {
                let existing = self
                    .store
                    .find_view_record_by_key(&key)
                    .await?
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "View record for user {} vanished during duplicate merge",
                            key.user_id
                        )
                    })?;

                let merged = self.store.patch_view_record(existing, details).await?;

                info!(
                    "Merged duplicate view record for user {} content {} at {}",
                    key.user_id, key.content_id, key.watched_at
                );

                Ok(merged)
            }
        }
    }

    /// Watch history for one user, newest first, joined with the watched
    /// content where it still exists.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<(view_history::Model, Option<content::Model>)>> {
        self.store
            .list_user_history(user_id.value(), offset, limit)
            .await
    }
}
