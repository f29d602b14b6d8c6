//! Session cookie configuration.

use serde::{Deserialize, Serialize};

/// Attributes for the `access_token` cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieConfig {
    /// `Domain` attribute, e.g. `.example.com`.
    pub domain: String,
    /// Fixed session window in minutes. When unset the cookie lives exactly
    /// as long as the access token it carries.
    #[serde(default)]
    pub max_age_minutes: Option<u64>,
}
