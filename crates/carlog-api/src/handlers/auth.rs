//! Auth handlers: provider login, callback, refresh, me, logout.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::HeaderValue;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use tracing::{info, warn};
use uuid::Uuid;

use carlog_auth::{AuthenticatedIdentity, SessionCookieManager};
use carlog_core::error::AppError;

use crate::dto::request::{CallbackQuery, RefreshRequest};
use crate::dto::response::MessageResponse;
use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Cookie carrying the OAuth `state` between initiate and callback.
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

const OAUTH_STATE_PATH: &str = "/api/auth";
const OAUTH_STATE_TTL_MINUTES: i64 = 10;

/// GET /api/auth/{provider}
pub async fn initiate(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> ApiResult<Response> {
    let provider = state.provider(&provider)?;

    let oauth_state = Uuid::new_v4().simple().to_string();
    let url = provider.authorization_url(&oauth_state)?;

    let mut response = Redirect::to(&url).into_response();
    append_set_cookies(
        &mut response,
        [oauth_state_cookie(oauth_state, time::Duration::minutes(OAUTH_STATE_TTL_MINUTES))
            .to_string()],
    )?;
    Ok(response)
}

/// GET /api/auth/{provider}/redirect
///
/// The `oauth_state` cookie is single-use: it is cleared on success and
/// on every failure.
pub async fn callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(query): Query<CallbackQuery>,
    jar: CookieJar,
) -> ApiResult<Response> {
    let clear_state = oauth_state_cookie(String::new(), time::Duration::ZERO).to_string();

    match complete_login(&state, &provider, query, &jar).await {
        Ok(cookies) => {
            let mut response =
                Redirect::to(&state.config.frontend.post_login_url()).into_response();
            append_set_cookies(&mut response, std::iter::once(clear_state).chain(cookies))?;
            Ok(response)
        }
        Err(err) => {
            let mut response = err.into_response();
            append_set_cookies(&mut response, [clear_state])?;
            Ok(response)
        }
    }
}

/// Checks the callback parameters, exchanges the code and opens a session.
/// Returns the session `Set-Cookie` values.
async fn complete_login(
    state: &AppState,
    provider: &str,
    query: CallbackQuery,
    jar: &CookieJar,
) -> ApiResult<Vec<String>> {
    let provider = state.provider(provider)?;

    if let Some(error) = query.error {
        warn!(provider = provider.name(), error = %error, "Provider login was not completed");
        return Err(AppError::authentication(format!("Provider login failed: {error}")).into());
    }

    let expected = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    match (expected.as_deref(), query.state.as_deref()) {
        (Some(expected), Some(actual)) if !expected.is_empty() && expected == actual => {}
        _ => {
            warn!(provider = provider.name(), "OAuth state mismatch");
            return Err(AppError::authentication("OAuth state mismatch").into());
        }
    }

    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::validation("Missing authorization code"))?;

    let profile = provider.exchange(&code).await?;
    let grant = state.sessions.login(&profile).await?;

    info!(
        provider = provider.name(),
        external_id = %grant.identity.external_id,
        "Provider login completed"
    );

    Ok(grant.cookies.header_values())
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> ApiResult<Response> {
    let presented = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        serde_json::from_slice::<RefreshRequest>(&body)
            .map_err(|e| AppError::validation(format!("Invalid refresh request body: {e}")))?
            .refresh_token
    };

    let access = SessionCookieManager::read(&jar);
    let grant = state
        .sessions
        .refresh(access.as_deref(), presented.as_deref())
        .await?;

    let mut response = Json(MessageResponse::new("Access token refreshed")).into_response();
    append_set_cookies(&mut response, grant.cookies.header_values())?;
    Ok(response)
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<AuthenticatedIdentity>> {
    let identity = state.sessions.who_am_i(Some(auth.identity()))?;
    Ok(Json(identity))
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Response> {
    let cleared = state.sessions.logout(Some(auth.identity())).await?;

    let mut response = Json(MessageResponse::new("Logged out successfully")).into_response();
    append_set_cookies(&mut response, cleared.header_values())?;
    Ok(response)
}

fn oauth_state_cookie(value: String, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE, value))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .path(OAUTH_STATE_PATH)
        .max_age(max_age)
        .build()
}

/// Appends `Set-Cookie` headers in the given order.
fn append_set_cookies(
    response: &mut Response,
    cookies: impl IntoIterator<Item = String>,
) -> Result<(), ApiError> {
    for cookie in cookies {
        let value = HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::internal(format!("Invalid Set-Cookie header: {e}")))?;
        response.headers_mut().append(SET_COOKIE, value);
    }
    Ok(())
}
