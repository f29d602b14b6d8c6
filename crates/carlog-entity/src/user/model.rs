//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::profile::ExternalProfile;

/// A user known to Carlog through an external identity provider.
///
/// `external_id` is the only key used to resolve a returning user; email
/// addresses may change or be reused and are never used for lookup.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Internal identifier.
    pub id: Uuid,
    /// Provider subject identifier (unique).
    pub external_id: String,
    /// Provider name, e.g. `google`.
    pub provider: String,
    /// Email address reported by the provider.
    pub email: String,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Avatar URL.
    pub avatar_url: Option<String>,
    /// Refresh credential issued by the provider itself, stored verbatim.
    #[serde(skip_serializing)]
    pub provider_refresh_token: Option<String>,
    /// The single current session refresh token (one slot per user).
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    /// When the user was first seen.
    pub created_at: DateTime<Utc>,
    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Human-readable name built from the stored name parts.
    pub fn display_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.to_string()),
            (None, Some(last)) => Some(last.to_string()),
            (None, None) => None,
        }
    }
}

/// Data required to create a user on first login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Provider subject identifier.
    pub external_id: String,
    /// Provider name.
    pub provider: String,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Avatar URL.
    pub avatar_url: Option<String>,
    /// Provider refresh credential, stored verbatim.
    pub provider_refresh_token: Option<String>,
}

impl From<&ExternalProfile> for NewUser {
    fn from(profile: &ExternalProfile) -> Self {
        Self {
            external_id: profile.subject.clone(),
            provider: profile.provider.clone(),
            email: profile.email.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            avatar_url: profile.avatar_url.clone(),
            provider_refresh_token: profile.refresh_credential.clone(),
        }
    }
}
