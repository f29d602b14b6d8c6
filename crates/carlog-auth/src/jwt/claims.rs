//! JWT claims shared by access and refresh tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims payload of both token classes.
///
/// Access tokens carry `email`; refresh tokens carry only the subject and
/// session id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's external provider id.
    pub sub: String,
    /// Email address, present on access tokens only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token class.
    pub typ: TokenClass,
    /// Login session shared by the access and refresh token minted together.
    pub sid: String,
}

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenClass {
    /// Short-lived token carried in the session cookie.
    Access,
    /// Long-lived token kept in the per-user refresh slot.
    Refresh,
}

impl Claims {
    /// The external id this token was minted for.
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// The login session this token belongs to.
    pub fn session_id(&self) -> &str {
        &self.sid
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// Whether the token is expired at `now`, allowing `leeway_seconds` of skew.
    pub fn is_expired_at(&self, now: DateTime<Utc>, leeway_seconds: i64) -> bool {
        now.timestamp() >= self.exp + leeway_seconds
    }
}
