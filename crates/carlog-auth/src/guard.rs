//! Per-request access token check.
//!
//! `Unauthenticated → Verifying → {Authenticated, Rejected}`. The guard only
//! reads the cookie value and the clock; it never consults the refresh
//! store, so an expired access token is rejected here and the client is
//! expected to call refresh explicitly.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AuthError, AuthResult};
use crate::jwt::{TokenClass, TokenService};

/// Identity decoded from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    /// External provider id (token subject).
    pub external_id: String,
    /// Email address carried by the token.
    pub email: String,
}

/// Verifies the session cookie and yields the caller's identity.
#[derive(Debug, Clone)]
pub struct AuthGuard {
    tokens: Arc<TokenService>,
}

impl AuthGuard {
    /// Creates a guard over the given token service.
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    /// Authenticate the `access_token` cookie value, if one was sent.
    pub fn authenticate(&self, cookie: Option<&str>) -> AuthResult<AuthenticatedIdentity> {
        let token = cookie.ok_or(AuthError::NoCredential)?;

        let claims = self
            .tokens
            .verify(token, TokenClass::Access)
            .map_err(|e| {
                debug!(error = %e, "Access token rejected");
                AuthError::from(e)
            })?;

        let email = claims.email.ok_or(AuthError::InvalidSignature)?;
        Ok(AuthenticatedIdentity {
            external_id: claims.sub,
            email,
        })
    }
}
