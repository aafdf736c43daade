//! User registration and lookup by external account id.

use thiserror::Error;
use tracing::info;

use crate::db::{NewUser, Store};
use crate::entities::users;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User with account id '{0}' already exists")]
    DuplicateAccount(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

pub struct UserService {
    store: Store,
}

impl UserService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn get_by_account_id(
        &self,
        account_id: &str,
    ) -> Result<Option<users::Model>, UserError> {
        Ok(self.store.get_user_by_account_id(account_id).await?)
    }

    /// Registers a user. The account id is the external identity, so a
    /// second registration under the same id is rejected instead of
    /// creating a twin row.
    pub async fn register(&self, new: NewUser) -> Result<users::Model, UserError> {
        if self
            .store
            .get_user_by_account_id(&new.account_id)
            .await?
            .is_some()
        {
            return Err(UserError::DuplicateAccount(new.account_id));
        }

        let created = self.store.create_user(new).await?;

        info!(
            "User {} registered for account {}",
            created.id, created.account_id
        );

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_error_names_the_account() {
        let err = UserError::DuplicateAccount("12345".to_string());
        assert!(err.to_string().contains("12345"));
    }
}
