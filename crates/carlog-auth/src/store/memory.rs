//! In-process user store backed by `DashMap`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use carlog_core::error::AppError;
use carlog_core::result::AppResult;
use carlog_entity::user::{NewUser, User};

use super::{IdentityStore, RefreshTokenStore};

/// Keeps users in memory, keyed by external id.
///
/// Each operation touches a single map entry under its shard lock, which
/// gives the same single-row atomicity as the PostgreSQL store.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<DashMap<String, User>>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of known users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether no user has been created yet.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl IdentityStore for MemoryUserStore {
    async fn find_by_external_id(&self, external_id: &str) -> AppResult<Option<User>> {
        Ok(self.users.get(external_id).map(|u| u.value().clone()))
    }

    async fn create(&self, data: &NewUser) -> AppResult<User> {
        match self.users.entry(data.external_id.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "User with external id '{}' already exists",
                data.external_id
            ))),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let user = User {
                    id: Uuid::new_v4(),
                    external_id: data.external_id.clone(),
                    provider: data.provider.clone(),
                    email: data.email.clone(),
                    first_name: data.first_name.clone(),
                    last_name: data.last_name.clone(),
                    avatar_url: data.avatar_url.clone(),
                    provider_refresh_token: data.provider_refresh_token.clone(),
                    refresh_token: None,
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    async fn update_provider_credential(
        &self,
        external_id: &str,
        credential: Option<&str>,
    ) -> AppResult<User> {
        let mut user = self
            .users
            .get_mut(external_id)
            .ok_or_else(|| AppError::not_found(format!("User '{external_id}' not found")))?;
        if let Some(credential) = credential {
            user.provider_refresh_token = Some(credential.to_string());
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryUserStore {
    async fn save(&self, external_id: &str, token: &str) -> AppResult<()> {
        let mut user = self
            .users
            .get_mut(external_id)
            .ok_or_else(|| AppError::not_found(format!("User '{external_id}' not found")))?;
        user.refresh_token = Some(token.to_string());
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn get(&self, external_id: &str) -> AppResult<Option<String>> {
        Ok(self
            .users
            .get(external_id)
            .and_then(|u| u.refresh_token.clone()))
    }

    async fn clear(&self, external_id: &str) -> AppResult<()> {
        if let Some(mut user) = self.users.get_mut(external_id) {
            user.refresh_token = None;
            user.updated_at = Utc::now();
        }
        Ok(())
    }
}
