//! Maps provider profiles onto internal users.

use std::sync::Arc;

use tracing::info;

use carlog_entity::user::{ExternalProfile, NewUser, User};

use crate::error::{AuthError, AuthResult};
use crate::store::IdentityStore;

/// Create-or-update of users keyed by external provider id.
///
/// Returning users only get their provider credential refreshed; name and
/// avatar keep their first-seen values.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    store: Arc<dyn IdentityStore>,
}

impl IdentityResolver {
    /// Creates a resolver over the given store.
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// Resolve `profile` to a user, creating it on first sight.
    ///
    /// Losing a concurrent first-login race surfaces as
    /// [`AuthError::IdentityConflict`]; the client is expected to retry.
    pub async fn upsert(&self, profile: &ExternalProfile) -> AuthResult<User> {
        let existing = self.store.find_by_external_id(&profile.subject).await?;

        if existing.is_some() {
            let user = self
                .store
                .update_provider_credential(&profile.subject, profile.refresh_credential.as_deref())
                .await?;
            return Ok(user);
        }

        match self.store.create(&NewUser::from(profile)).await {
            Ok(user) => {
                info!(
                    external_id = %user.external_id,
                    provider = %user.provider,
                    "Created user on first login"
                );
                Ok(user)
            }
            Err(e) if e.is_conflict() => Err(AuthError::IdentityConflict(e.message)),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::store::{MemoryUserStore, RefreshTokenStore};

    pub(crate) fn profile(subject: &str, email: &str) -> ExternalProfile {
        ExternalProfile {
            provider: "google".to_string(),
            subject: subject.to_string(),
            email: email.to_string(),
            first_name: Some("Ana".to_string()),
            last_name: Some("Pop".to_string()),
            avatar_url: Some("https://img.example/ana.png".to_string()),
            refresh_credential: Some("provider-rt-1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_creates_user_on_first_sight() {
        let store = Arc::new(MemoryUserStore::new());
        let resolver = IdentityResolver::new(store.clone());

        let user = resolver.upsert(&profile("g-1", "a@x.com")).await.unwrap();
        assert_eq!(user.external_id, "g-1");
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.provider_refresh_token.as_deref(), Some("provider-rt-1"));
        assert_eq!(user.display_name().as_deref(), Some("Ana Pop"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_returning_user_keeps_profile_fields() {
        let store = Arc::new(MemoryUserStore::new());
        let resolver = IdentityResolver::new(store.clone());
        let first = resolver.upsert(&profile("g-1", "a@x.com")).await.unwrap();

        let mut again = profile("g-1", "new@x.com");
        again.first_name = Some("Anastasia".to_string());
        again.refresh_credential = Some("provider-rt-2".to_string());
        let second = resolver.upsert(&again).await.unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.email, "a@x.com");
        assert_eq!(second.first_name.as_deref(), Some("Ana"));
        assert_eq!(second.provider_refresh_token.as_deref(), Some("provider-rt-2"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_resolution_ignores_email() {
        let store = Arc::new(MemoryUserStore::new());
        let resolver = IdentityResolver::new(store.clone());
        resolver.upsert(&profile("g-1", "shared@x.com")).await.unwrap();
        resolver.upsert(&profile("g-2", "shared@x.com")).await.unwrap();
        assert_eq!(store.len(), 2);
    }

    /// Never sees existing users, like a request that lost the race between
    /// its lookup and its insert.
    #[derive(Debug)]
    struct LateLookupStore(MemoryUserStore);

    #[async_trait::async_trait]
    impl IdentityStore for LateLookupStore {
        async fn find_by_external_id(
            &self,
            _external_id: &str,
        ) -> carlog_core::AppResult<Option<User>> {
            Ok(None)
        }

        async fn create(&self, user: &NewUser) -> carlog_core::AppResult<User> {
            self.0.create(user).await
        }

        async fn update_provider_credential(
            &self,
            external_id: &str,
            credential: Option<&str>,
        ) -> carlog_core::AppResult<User> {
            self.0.update_provider_credential(external_id, credential).await
        }
    }

    #[tokio::test]
    async fn test_concurrent_first_login_loser_gets_conflict() {
        let resolver = IdentityResolver::new(Arc::new(LateLookupStore(MemoryUserStore::new())));
        resolver.upsert(&profile("g-1", "a@x.com")).await.unwrap();

        let err = resolver.upsert(&profile("g-1", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::IdentityConflict(_)));
        assert_eq!(err.reason(), "IDENTITY_CONFLICT");
    }

    #[tokio::test]
    async fn test_upsert_does_not_touch_refresh_slot() {
        let store = Arc::new(MemoryUserStore::new());
        let resolver = IdentityResolver::new(store.clone());
        resolver.upsert(&profile("g-1", "a@x.com")).await.unwrap();
        store.save("g-1", "session-rt").await.unwrap();

        resolver.upsert(&profile("g-1", "a@x.com")).await.unwrap();
        assert_eq!(store.get("g-1").await.unwrap().as_deref(), Some("session-rt"));
    }
}
