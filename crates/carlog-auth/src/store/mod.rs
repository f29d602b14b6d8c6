//! Persistence seams for user identities and the refresh token slot.
//!
//! Both traits are keyed by the external provider id. Implementations:
//! [`PgUserStore`] over PostgreSQL and [`MemoryUserStore`] for tests and
//! local development.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use carlog_core::result::AppResult;
use carlog_entity::user::{NewUser, User};

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

/// Lookup and creation of user identities.
#[async_trait]
pub trait IdentityStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by external id.
    async fn find_by_external_id(&self, external_id: &str) -> AppResult<Option<User>>;

    /// Create a user. Fails with `ErrorKind::Conflict` when the external id
    /// already exists.
    async fn create(&self, user: &NewUser) -> AppResult<User>;

    /// Overwrite the provider-issued refresh credential; `None` keeps the
    /// previous value.
    async fn update_provider_credential(
        &self,
        external_id: &str,
        credential: Option<&str>,
    ) -> AppResult<User>;
}

/// One refresh token slot per user, last writer wins.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync + std::fmt::Debug + 'static {
    /// Unconditionally overwrite the slot.
    async fn save(&self, external_id: &str, token: &str) -> AppResult<()>;

    /// Read the slot.
    async fn get(&self, external_id: &str) -> AppResult<Option<String>>;

    /// Empty the slot. Clearing an empty slot (or an unknown user) succeeds.
    async fn clear(&self, external_id: &str) -> AppResult<()>;
}
