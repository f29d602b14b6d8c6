//! Application state shared across all handlers and middleware.

use std::collections::HashMap;
use std::sync::Arc;

use carlog_auth::{
    AuthGuard, Clock, IdentityProvider, IdentityStore, RefreshTokenStore, SessionCookieManager,
    SessionManager, TokenService,
};
use carlog_core::config::AppConfig;
use carlog_core::error::AppError;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Per-request access cookie check
    pub guard: Arc<AuthGuard>,
    /// Login, refresh and logout flows
    pub sessions: Arc<SessionManager>,
    /// Enabled identity providers, keyed by route name
    pub providers: Arc<HashMap<String, Arc<dyn IdentityProvider>>>,
}

impl AppState {
    /// Wire the auth components over the given stores, providers and clock.
    pub fn new(
        config: AppConfig,
        identity_store: Arc<dyn IdentityStore>,
        refresh_store: Arc<dyn RefreshTokenStore>,
        providers: Vec<Arc<dyn IdentityProvider>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let tokens = Arc::new(TokenService::new(&config.auth, clock));
        let cookies = SessionCookieManager::new(&config.cookie, tokens.access_ttl());
        let guard = Arc::new(AuthGuard::new(Arc::clone(&tokens)));
        let sessions = Arc::new(SessionManager::new(
            identity_store,
            refresh_store,
            Arc::clone(&tokens),
            cookies,
        ));

        let providers = providers
            .into_iter()
            .map(|p| (p.name().to_string(), p))
            .collect();

        Self {
            config: Arc::new(config),
            guard,
            sessions,
            providers: Arc::new(providers),
        }
    }

    /// Look up an enabled identity provider by route name.
    pub fn provider(&self, name: &str) -> Result<Arc<dyn IdentityProvider>, AppError> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Unknown identity provider '{name}'")))
    }
}
