//! JWT token creation with separate secrets per token class.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use carlog_core::config::AuthConfig;

use super::claims::{Claims, TokenClass};
use super::error::TokenError;
use crate::clock::Clock;

/// A freshly signed token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Compact JWS string.
    pub token: String,
    /// Expiration instant.
    pub expires_at: DateTime<Utc>,
    /// Lifetime the token was minted with.
    pub ttl: Duration,
}

/// Signs access and refresh tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    access_key: EncodingKey,
    refresh_key: EncodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            access_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl: Duration::minutes(config.access_ttl_minutes as i64),
            refresh_ttl: Duration::days(config.refresh_ttl_days as i64),
            clock,
        }
    }

    /// Lifetime of access tokens.
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Signs `{sub, email, sid}` with the access secret.
    pub fn mint_access(
        &self,
        external_id: &str,
        email: &str,
        session_id: &str,
    ) -> Result<IssuedToken, TokenError> {
        self.mint(external_id, Some(email), session_id, TokenClass::Access)
    }

    /// Signs `{sub, sid}` with the refresh secret.
    pub fn mint_refresh(
        &self,
        external_id: &str,
        session_id: &str,
    ) -> Result<IssuedToken, TokenError> {
        self.mint(external_id, None, session_id, TokenClass::Refresh)
    }

    fn mint(
        &self,
        external_id: &str,
        email: Option<&str>,
        session_id: &str,
        class: TokenClass,
    ) -> Result<IssuedToken, TokenError> {
        let (key, ttl) = match class {
            TokenClass::Access => (&self.access_key, self.access_ttl),
            TokenClass::Refresh => (&self.refresh_key, self.refresh_ttl),
        };

        let now = self.clock.now();
        let expires_at = now + ttl;
        let claims = Claims {
            sub: external_id.to_string(),
            email: email.map(str::to_string),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            typ: class,
            sid: session_id.to_string(),
        };

        let token = encode(&Header::default(), &claims, key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at,
            ttl,
        })
    }
}
