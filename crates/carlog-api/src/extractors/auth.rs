//! `AuthUser` extractor: reads the `access_token` cookie, runs the guard and
//! injects the caller's identity.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use carlog_auth::{AuthenticatedIdentity, SessionCookieManager};

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthenticatedIdentity);

impl AuthUser {
    /// Returns the inner identity.
    pub fn identity(&self) -> &AuthenticatedIdentity {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = AuthenticatedIdentity;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = SessionCookieManager::read(&jar);

        let identity = state.guard.authenticate(token.as_deref())?;
        Ok(AuthUser(identity))
    }
}
