//! Profile handed over by an identity provider adapter.

use serde::{Deserialize, Serialize};

/// A validated identity assertion from an external provider.
///
/// The adapter that produces this value has already completed the
/// provider handshake; the fields are trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalProfile {
    /// Provider name, e.g. `google`.
    pub provider: String,
    /// Provider subject identifier.
    pub subject: String,
    /// Verified email address.
    pub email: String,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Avatar URL.
    pub avatar_url: Option<String>,
    /// Refresh credential issued by the provider, if any.
    #[serde(skip_serializing)]
    pub refresh_credential: Option<String>,
}
