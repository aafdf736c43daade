use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use tracing::info;

use crate::entities::{prelude::*, users};

/// Profile fields for a lazily-created account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub account_id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<users::Model>> {
        Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by id")
    }

    pub async fn get_by_account_id(&self, account_id: &str) -> Result<Option<users::Model>> {
        Users::find()
            .filter(users::Column::AccountId.eq(account_id))
            .one(&self.conn)
            .await
            .context("Failed to query user by account id")
    }

    pub async fn create(&self, fields: NewUser) -> Result<users::Model> {
        let active_model = users::ActiveModel {
            account_id: Set(fields.account_id.clone()),
            username: Set(fields.username),
            first_name: Set(fields.first_name),
            last_name: Set(fields.last_name),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert user")?;

        info!("Created user {} for account {}", model.id, fields.account_id);
        Ok(model)
    }

    pub async fn count_all(&self) -> Result<u64> {
        Users::find()
            .count(&self.conn)
            .await
            .context("Failed to count users")
    }
}
