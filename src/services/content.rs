//! Stored catalogue lookups and registration.

use anyhow::Result;

use crate::db::{NewContent, Store};
use crate::domain::ContentId;
use crate::entities::content;

pub struct ContentService {
    store: Store,
}

impl ContentService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: ContentId) -> Result<Option<content::Model>> {
        self.store.get_content(id.value()).await
    }

    pub async fn get_by_imdb_id(&self, imdb_id: &str) -> Result<Option<content::Model>> {
        self.store.get_content_by_imdb_id(imdb_id).await
    }

    /// Registers content in the catalogue. When the IMDb id is already
    /// stored the existing row comes back instead of a duplicate; rows
    /// without an IMDb id always insert.
    pub async fn register(&self, new: NewContent) -> Result<content::Model> {
        self.store.insert_content_if_absent(new).await
    }
}
