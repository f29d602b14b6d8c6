//! PostgreSQL-backed stores wrapping the user repository.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use carlog_core::result::AppResult;
use carlog_database::repositories::user::UserRepository;
use carlog_entity::user::{NewUser, User};

use super::{IdentityStore, RefreshTokenStore};

/// Identity and refresh slot persistence on the `users` table.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    repo: Arc<UserRepository>,
}

impl PgUserStore {
    /// Creates a new store over the given repository.
    pub fn new(repo: Arc<UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl IdentityStore for PgUserStore {
    async fn find_by_external_id(&self, external_id: &str) -> AppResult<Option<User>> {
        self.repo.find_by_external_id(external_id).await
    }

    async fn create(&self, user: &NewUser) -> AppResult<User> {
        self.repo.create(user).await
    }

    async fn update_provider_credential(
        &self,
        external_id: &str,
        credential: Option<&str>,
    ) -> AppResult<User> {
        self.repo
            .update_provider_refresh_token(external_id, credential)
            .await
    }
}

#[async_trait]
impl RefreshTokenStore for PgUserStore {
    async fn save(&self, external_id: &str, token: &str) -> AppResult<()> {
        if !self.repo.set_refresh_token(external_id, Some(token)).await? {
            return Err(carlog_core::AppError::not_found(format!(
                "User '{external_id}' not found"
            )));
        }
        Ok(())
    }

    async fn get(&self, external_id: &str) -> AppResult<Option<String>> {
        self.repo.get_refresh_token(external_id).await
    }

    async fn clear(&self, external_id: &str) -> AppResult<()> {
        if !self.repo.set_refresh_token(external_id, None).await? {
            warn!(external_id, "Cleared refresh token for unknown user");
        }
        Ok(())
    }
}
