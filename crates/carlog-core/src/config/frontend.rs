//! Front-end redirect configuration.

use serde::{Deserialize, Serialize};

/// Where the browser is sent after a completed provider login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Base URL of the front-end application.
    pub base_url: String,
    /// Path appended to `base_url` after login.
    #[serde(default = "default_post_login_path")]
    pub post_login_path: String,
}

impl FrontendConfig {
    /// Full URL of the post-login landing page.
    pub fn post_login_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.post_login_path
        )
    }
}

fn default_post_login_path() -> String {
    "/main/cars".to_string()
}
