//! Google OAuth 2.0 / OpenID Connect adapter.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use carlog_core::config::GoogleOAuthConfig;
use carlog_core::error::{AppError, ErrorKind};
use carlog_core::result::AppResult;
use carlog_entity::user::ExternalProfile;

use super::IdentityProvider;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// OpenID Connect userinfo response.
#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<bool>,
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default)]
    family_name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

impl GoogleUserInfo {
    fn into_profile(self, refresh_credential: Option<String>) -> AppResult<ExternalProfile> {
        let email = self
            .email
            .ok_or_else(|| AppError::authentication("Google account has no email address"))?;
        if self.email_verified == Some(false) {
            return Err(AppError::authentication(
                "Google account email is not verified",
            ));
        }

        Ok(ExternalProfile {
            provider: "google".to_string(),
            subject: self.sub,
            email,
            first_name: self.given_name,
            last_name: self.family_name,
            avatar_url: self.picture,
            refresh_credential,
        })
    }
}

/// Authorization-code login against Google.
#[derive(Debug, Clone)]
pub struct GoogleProvider {
    config: GoogleOAuthConfig,
    http: reqwest::Client,
}

impl GoogleProvider {
    /// Creates a new provider with its own HTTP client.
    pub fn new(config: GoogleOAuthConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    async fn ensure_success(
        response: reqwest::Response,
        operation: &'static str,
    ) -> AppResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(operation, status = status.as_u16(), body = %body, "Google request failed");
        Err(AppError::external_service(format!(
            "Google {operation} failed with status {status}"
        )))
    }

    async fn fetch_tokens(&self, code: &str) -> AppResult<TokenResponse> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.callback_url.as_str()),
        ];

        let response = self
            .http
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Google token exchange failed", e)
            })?;

        Self::ensure_success(response, "token exchange")
            .await?
            .json::<TokenResponse>()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    "Malformed Google token response",
                    e,
                )
            })
    }

    async fn fetch_userinfo(&self, access_token: &str) -> AppResult<GoogleUserInfo> {
        let response = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Google userinfo request failed", e)
            })?;

        Self::ensure_success(response, "userinfo request")
            .await?
            .json::<GoogleUserInfo>()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    "Malformed Google userinfo response",
                    e,
                )
            })
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
    }

    fn authorization_url(&self, state: &str) -> AppResult<String> {
        let scope = self.config.scopes.join(" ");
        let url = Url::parse_with_params(
            AUTH_URL,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("scope", scope.as_str()),
                ("state", state),
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )
        .map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid Google authorization URL", e)
        })?;
        Ok(url.into())
    }

    async fn exchange(&self, code: &str) -> AppResult<ExternalProfile> {
        let tokens = self.fetch_tokens(code).await?;
        let info = self.fetch_userinfo(&tokens.access_token).await?;
        debug!(subject = %info.sub, "Fetched Google profile");
        info.into_profile(tokens.refresh_token)
    }
}
