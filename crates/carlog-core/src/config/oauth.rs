//! Identity provider configuration.

use serde::{Deserialize, Serialize};

/// Identity providers enabled for login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// Google OAuth 2.0 client. Login via Google is disabled when absent.
    #[serde(default)]
    pub google: Option<GoogleOAuthConfig>,
}

/// Google OAuth 2.0 client registration.
#[derive(Clone, Serialize, Deserialize)]
pub struct GoogleOAuthConfig {
    /// OAuth client ID.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Redirect URI registered with Google, pointing at
    /// `/api/auth/google/redirect`.
    #[serde(default = "default_callback_url")]
    pub callback_url: String,
    /// Requested scopes.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

impl std::fmt::Debug for GoogleOAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleOAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("callback_url", &self.callback_url)
            .field("scopes", &self.scopes)
            .finish()
    }
}

fn default_callback_url() -> String {
    "http://localhost:3000/api/auth/google/redirect".to_string()
}

fn default_scopes() -> Vec<String> {
    vec!["email".to_string(), "profile".to_string()]
}
