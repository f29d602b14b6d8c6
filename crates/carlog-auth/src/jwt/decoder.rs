//! JWT token verification.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use tracing::debug;

use carlog_core::config::AuthConfig;

use super::claims::{Claims, TokenClass};
use super::error::TokenError;
use crate::clock::Clock;

/// Subject and session id read from a token whose signature was NOT checked.
///
/// Only good for choosing which stored state to load before a signed
/// check; it must never authorize anything on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnverifiedSubject {
    sub: String,
    sid: Option<String>,
}

impl UnverifiedSubject {
    /// The claimed subject.
    pub fn as_str(&self) -> &str {
        &self.sub
    }

    /// The claimed login session, if the token carries one.
    pub fn session_id(&self) -> Option<&str> {
        self.sid.as_deref()
    }
}

#[derive(Deserialize)]
struct SubjectOnly {
    sub: String,
    #[serde(default)]
    sid: Option<String>,
}

/// Verifies access and refresh tokens against their own secrets.
#[derive(Clone)]
pub struct JwtDecoder {
    access_key: DecodingKey,
    refresh_key: DecodingKey,
    validation: Validation,
    leeway_seconds: i64,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock instead.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            access_key: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
            leeway_seconds: config.leeway_seconds as i64,
            clock,
        }
    }

    /// Checks signature, token class, then expiry.
    pub fn verify(&self, token: &str, class: TokenClass) -> Result<Claims, TokenError> {
        let key = match class {
            TokenClass::Access => &self.access_key,
            TokenClass::Refresh => &self.refresh_key,
        };

        let claims = decode::<Claims>(token, key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, ?class, "Token rejected");
                TokenError::InvalidSignature
            })?
            .claims;

        if claims.typ != class {
            debug!(expected = ?class, actual = ?claims.typ, "Token class mismatch");
            return Err(TokenError::InvalidSignature);
        }

        if claims.is_expired_at(self.clock.now(), self.leeway_seconds) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Reads the `sub` and `sid` claims without checking signature or expiry.
    pub fn insecure_peek_subject(token: &str) -> Result<UnverifiedSubject, TokenError> {
        let mut parts = token.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => return Err(TokenError::InvalidSignature),
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::InvalidSignature)?;
        let SubjectOnly { sub, sid } =
            serde_json::from_slice(&bytes).map_err(|_| TokenError::InvalidSignature)?;

        if sub.is_empty() {
            return Err(TokenError::InvalidSignature);
        }
        Ok(UnverifiedSubject { sub, sid })
    }
}
