//! Identity provider adapters.
//!
//! An adapter runs the provider handshake and yields a trusted
//! [`ExternalProfile`]; everything after that point is provider-agnostic.

pub mod google;

use async_trait::async_trait;

use carlog_core::result::AppResult;
use carlog_entity::user::ExternalProfile;

pub use google::GoogleProvider;

/// An external OAuth 2.0 identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Route segment and `users.provider` value, e.g. `google`.
    fn name(&self) -> &str;

    /// URL the browser is sent to in order to start the login.
    fn authorization_url(&self, state: &str) -> AppResult<String>;

    /// Exchange an authorization code for the caller's profile.
    async fn exchange(&self, code: &str) -> AppResult<ExternalProfile>;
}
