//! Shared test helpers for integration tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use carlog_auth::{FixedClock, IdentityProvider, MemoryUserStore};
use carlog_core::config::AppConfig;
use carlog_core::error::AppError;
use carlog_core::result::AppResult;
use carlog_entity::user::ExternalProfile;

/// Identity provider that hands out pre-registered profiles per code.
#[derive(Debug, Default)]
pub struct StubProvider {
    profiles: Mutex<HashMap<String, ExternalProfile>>,
}

impl StubProvider {
    /// Make `code` exchange to `profile`.
    pub fn register(&self, code: &str, profile: ExternalProfile) {
        self.profiles
            .lock()
            .expect("stub provider lock poisoned")
            .insert(code.to_string(), profile);
    }
}

#[async_trait]
impl IdentityProvider for StubProvider {
    fn name(&self) -> &str {
        "google"
    }

    fn authorization_url(&self, state: &str) -> AppResult<String> {
        Ok(format!("https://idp.test/authorize?state={state}"))
    }

    async fn exchange(&self, code: &str) -> AppResult<ExternalProfile> {
        self.profiles
            .lock()
            .expect("stub provider lock poisoned")
            .get(code)
            .cloned()
            .ok_or_else(|| AppError::authentication("Unknown authorization code"))
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
    /// Backing identity and refresh store
    pub store: Arc<MemoryUserStore>,
    /// Clock shared by every token operation
    pub clock: Arc<FixedClock>,
    /// Identity provider registered as `google`
    pub provider: Arc<StubProvider>,
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let config = AppConfig::load_file("tests/fixtures/test_config.toml")
            .expect("Failed to load test config");

        let store = Arc::new(MemoryUserStore::new());
        let clock = Arc::new(FixedClock::starting_now());
        let provider = Arc::new(StubProvider::default());

        let state = carlog_api::AppState::new(
            config.clone(),
            store.clone(),
            store.clone(),
            vec![provider.clone() as Arc<dyn IdentityProvider>],
            clock.clone(),
        );

        Self {
            router: carlog_api::build_router(state),
            config,
            store,
            clock,
            provider,
        }
    }

    /// Complete a provider login for `subject` and return the access token.
    pub async fn login(&self, subject: &str, email: &str) -> String {
        let response = self.login_response(subject, email).await;
        assert_eq!(
            response.status,
            StatusCode::SEE_OTHER,
            "Login failed: {:?}",
            response.body
        );
        response
            .cookie("access_token")
            .expect("No access_token cookie in login response")
    }

    /// Run initiate + callback and return the callback response.
    pub async fn login_response(&self, subject: &str, email: &str) -> TestResponse {
        let code = format!("code-{subject}");
        self.provider.register(&code, profile(subject, email));

        let initiated = self.request("GET", "/api/auth/google", None, &[]).await;
        let state = initiated
            .cookie("oauth_state")
            .expect("No oauth_state cookie in initiate response");

        self.request(
            "GET",
            &format!("/api/auth/google/redirect?code={code}&state={state}"),
            None,
            &[("oauth_state", &state)],
        )
        .await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        cookies: &[(&str, &str)],
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);

        if !cookies.is_empty() {
            let cookie_header = cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            req = req.header(header::COOKIE, cookie_header);
        }

        let body = match body {
            Some(b) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_string(&b).expect("Failed to serialize body"))
            }
            None => Body::empty(),
        };

        let req = req.body(body).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let set_cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(String::from)
            .collect();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            set_cookies,
            location,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// `Set-Cookie` header values in emission order
    pub set_cookies: Vec<String>,
    /// `Location` header, if any
    pub location: Option<String>,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// Value of the last `Set-Cookie` directive for `name`, if any.
    pub fn cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{name}=");
        self.set_cookies
            .iter()
            .rev()
            .find_map(|c| c.split(';').next()?.strip_prefix(prefix.as_str()))
            .map(String::from)
    }

    /// Rejection reason of an error body.
    pub fn reason(&self) -> Option<&str> {
        self.body["details"]["reason"].as_str()
    }
}

/// Provider profile used by the login helpers.
pub fn profile(subject: &str, email: &str) -> ExternalProfile {
    ExternalProfile {
        provider: "google".to_string(),
        subject: subject.to_string(),
        email: email.to_string(),
        first_name: Some("Ana".to_string()),
        last_name: Some("Pop".to_string()),
        avatar_url: None,
        refresh_credential: Some("provider-refresh".to_string()),
    }
}

/// Flip one character in the signature segment of a JWT.
pub fn tamper(token: &str) -> String {
    let mut chars: Vec<char> = token.chars().collect();
    let idx = chars.len() - 10;
    chars[idx] = if chars[idx] == 'A' { 'B' } else { 'A' };
    chars.into_iter().collect()
}
