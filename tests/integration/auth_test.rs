//! Integration tests for the session authentication flow.

mod helpers;

use chrono::Duration;
use http::StatusCode;

use carlog_auth::RefreshTokenStore;

#[tokio::test]
async fn test_first_login_creates_user_and_sets_cookie() {
    let app = helpers::TestApp::new();

    let response = app.login_response("g-1", "a@x.com").await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location.as_deref(),
        Some("https://app.carlog.test/main/cars")
    );
    assert_eq!(app.store.len(), 1);
    assert!(app.store.get("g-1").await.unwrap().is_some());

    // oauth_state clear, access_token clear, access_token set
    let access: Vec<&String> = response
        .set_cookies
        .iter()
        .filter(|c| c.starts_with("access_token="))
        .collect();
    assert_eq!(access.len(), 2);
    assert!(access[0].starts_with("access_token=;"));
    assert!(!response.cookie("access_token").unwrap().is_empty());
    for directive in access {
        assert!(directive.contains("HttpOnly"));
        assert!(directive.contains("Secure"));
        assert!(directive.contains("SameSite=None"));
        assert!(directive.contains("Path=/"));
        assert!(directive.contains("Domain=carlog.test"));
    }
}

#[tokio::test]
async fn test_me_returns_identity() {
    let app = helpers::TestApp::new();
    let token = app.login("g-1", "a@x.com").await;

    let response = app
        .request("GET", "/api/auth/me", None, &[("access_token", &token)])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        serde_json::json!({ "external_id": "g-1", "email": "a@x.com" })
    );
}

#[tokio::test]
async fn test_me_without_cookie() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/auth/me", None, &[]).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
    assert_eq!(response.reason(), Some("NO_CREDENTIAL"));
}

#[tokio::test]
async fn test_me_with_expired_cookie() {
    let app = helpers::TestApp::new();
    let token = app.login("g-1", "a@x.com").await;

    app.clock.advance(Duration::minutes(16));
    let response = app
        .request("GET", "/api/auth/me", None, &[("access_token", &token)])
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), Some("EXPIRED"));
}

#[tokio::test]
async fn test_me_with_tampered_cookie() {
    let app = helpers::TestApp::new();
    let token = app.login("g-1", "a@x.com").await;

    let response = app
        .request(
            "GET",
            "/api/auth/me",
            None,
            &[("access_token", &helpers::tamper(&token))],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), Some("INVALID_SIGNATURE"));
}

#[tokio::test]
async fn test_refresh_with_expired_access_cookie() {
    let app = helpers::TestApp::new();
    let token = app.login("g-1", "a@x.com").await;

    app.clock.advance(Duration::minutes(20));
    let response = app
        .request("POST", "/api/auth/refresh", None, &[("access_token", &token)])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["message"].is_string());
    let refreshed = response.cookie("access_token").expect("refreshed cookie");
    assert_ne!(refreshed, token);

    let me = app
        .request("GET", "/api/auth/me", None, &[("access_token", &refreshed)])
        .await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["external_id"], "g-1");
}

#[tokio::test]
async fn test_refresh_presenting_overwritten_token() {
    let app = helpers::TestApp::new();
    let token = app.login("g-1", "a@x.com").await;
    let t1 = app.store.get("g-1").await.unwrap().unwrap();

    app.clock.advance(Duration::seconds(5));
    let second = app.login("g-1", "a@x.com").await;
    let t2 = app.store.get("g-1").await.unwrap().unwrap();
    assert_ne!(t1, t2);

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!({ "refresh_token": t1 })),
            &[("access_token", &token)],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), Some("REFRESH_INVALID"));

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!({ "refresh_token": t2 })),
            &[("access_token", &second)],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_cookie_only_refresh_after_concurrent_login() {
    let app = helpers::TestApp::new();
    let first = app.login("g-1", "a@x.com").await;

    app.clock.advance(Duration::seconds(5));
    let second = app.login("g-1", "a@x.com").await;

    app.clock.advance(Duration::minutes(20));
    let response = app
        .request("POST", "/api/auth/refresh", None, &[("access_token", &first)])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), Some("REFRESH_INVALID"));
    assert!(response.set_cookies.is_empty());

    let response = app
        .request("POST", "/api/auth/refresh", None, &[("access_token", &second)])
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_without_cookie() {
    let app = helpers::TestApp::new();

    let response = app.request("POST", "/api/auth/refresh", None, &[]).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), Some("NO_CREDENTIAL"));
}

#[tokio::test]
async fn test_refresh_after_refresh_expiry() {
    let app = helpers::TestApp::new();
    let token = app.login("g-1", "a@x.com").await;

    app.clock.advance(Duration::days(8));
    let response = app
        .request("POST", "/api/auth/refresh", None, &[("access_token", &token)])
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), Some("REFRESH_INVALID"));
}

#[tokio::test]
async fn test_logout_clears_state() {
    let app = helpers::TestApp::new();
    let token = app.login("g-1", "a@x.com").await;

    let response = app
        .request("POST", "/api/auth/logout", None, &[("access_token", &token)])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.set_cookies.len(), 1);
    assert!(response.set_cookies[0].starts_with("access_token=;"));
    assert!(response.set_cookies[0].contains("Max-Age=0"));
    assert_eq!(app.store.get("g-1").await.unwrap(), None);

    let response = app
        .request("POST", "/api/auth/refresh", None, &[("access_token", &token)])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), Some("REFRESH_MISSING"));
}

#[tokio::test]
async fn test_logout_requires_authentication() {
    let app = helpers::TestApp::new();

    let response = app.request("POST", "/api/auth/logout", None, &[]).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), Some("NO_CREDENTIAL"));
}

#[tokio::test]
async fn test_repeat_login_reuses_user() {
    let app = helpers::TestApp::new();
    app.login("g-1", "a@x.com").await;
    app.login("g-1", "a@x.com").await;
    app.login("g-2", "a@x.com").await;

    assert_eq!(app.store.len(), 2);
}

#[tokio::test]
async fn test_initiate_redirects_to_provider() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/auth/google", None, &[]).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let state = response.cookie("oauth_state").expect("oauth_state cookie");
    assert_eq!(
        response.location,
        Some(format!("https://idp.test/authorize?state={state}"))
    );
}

#[tokio::test]
async fn test_callback_rejects_state_mismatch() {
    let app = helpers::TestApp::new();
    app.provider
        .register("code-g-1", helpers::profile("g-1", "a@x.com"));

    let response = app
        .request(
            "GET",
            "/api/auth/google/redirect?code=code-g-1&state=forged",
            None,
            &[("oauth_state", "expected")],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_failed_callback_clears_oauth_state() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "GET",
            "/api/auth/google/redirect?code=unknown-code&state=expected",
            None,
            &[("oauth_state", "expected")],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.cookie("oauth_state").as_deref(), Some(""));
    let cleared = response
        .set_cookies
        .iter()
        .find(|c| c.starts_with("oauth_state=;"))
        .expect("oauth_state clear directive");
    assert!(cleared.contains("Max-Age=0"));
    assert!(cleared.contains("Path=/api/auth"));
    assert!(!response.set_cookies.iter().any(|c| c.starts_with("access_token=")));
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_provider_error_clears_oauth_state() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "GET",
            "/api/auth/google/redirect?error=access_denied&state=expected",
            None,
            &[("oauth_state", "expected")],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.cookie("oauth_state").as_deref(), Some(""));
}

#[tokio::test]
async fn test_unknown_provider() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/auth/myspace", None, &[]).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/health", None, &[]).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
}
