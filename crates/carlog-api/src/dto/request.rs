//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Query string of the provider callback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code issued by the provider.
    pub code: Option<String>,
    /// Opaque state echoed back by the provider.
    pub state: Option<String>,
    /// Error code when the user denied consent.
    pub error: Option<String>,
}

/// Optional body of `POST /api/auth/refresh`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token the client believes is current.
    #[serde(default)]
    pub refresh_token: Option<String>,
}
