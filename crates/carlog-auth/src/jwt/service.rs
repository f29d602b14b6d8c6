//! Token service: one entry point for minting and verifying both token classes.

use std::sync::Arc;

use chrono::Duration;

use carlog_core::config::AuthConfig;

use super::claims::{Claims, TokenClass};
use super::decoder::{JwtDecoder, UnverifiedSubject};
use super::encoder::{IssuedToken, JwtEncoder};
use super::error::TokenError;
use crate::clock::Clock;

/// Mints and verifies access and refresh tokens.
#[derive(Debug, Clone)]
pub struct TokenService {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl TokenService {
    /// Build both halves from the same configuration and clock.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoder: JwtEncoder::new(config, Arc::clone(&clock)),
            decoder: JwtDecoder::new(config, clock),
        }
    }

    /// Access token lifetime.
    pub fn access_ttl(&self) -> Duration {
        self.encoder.access_ttl()
    }

    /// Mint an access token for `{sub: external_id, email, sid}`.
    pub fn mint_access(
        &self,
        external_id: &str,
        email: &str,
        session_id: &str,
    ) -> Result<IssuedToken, TokenError> {
        self.encoder.mint_access(external_id, email, session_id)
    }

    /// Mint a refresh token for `{sub: external_id, sid}`.
    pub fn mint_refresh(
        &self,
        external_id: &str,
        session_id: &str,
    ) -> Result<IssuedToken, TokenError> {
        self.encoder.mint_refresh(external_id, session_id)
    }

    /// Verify `token` as a token of the given class.
    pub fn verify(&self, token: &str, class: TokenClass) -> Result<Claims, TokenError> {
        self.decoder.verify(token, class)
    }

    /// Read the subject without any verification. See [`UnverifiedSubject`].
    pub fn insecure_peek_subject(&self, token: &str) -> Result<UnverifiedSubject, TokenError> {
        JwtDecoder::insecure_peek_subject(token)
    }
}
