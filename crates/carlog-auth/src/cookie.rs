//! Transport of the access token in the `access_token` cookie.

use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::{Duration, OffsetDateTime};

use carlog_core::config::CookieConfig;

/// Fixed name of the session cookie.
pub const ACCESS_COOKIE_NAME: &str = "access_token";

/// Ordered `Set-Cookie` directives for one response.
#[derive(Debug, Clone, Default)]
pub struct SetCookies(Vec<Cookie<'static>>);

impl SetCookies {
    /// The directives in emission order.
    pub fn cookies(&self) -> &[Cookie<'static>] {
        &self.0
    }

    /// `Set-Cookie` header values in emission order.
    pub fn header_values(&self) -> Vec<String> {
        self.0.iter().map(|c| c.to_string()).collect()
    }

    /// Append another directive.
    pub fn push(&mut self, cookie: Cookie<'static>) {
        self.0.push(cookie);
    }
}

/// Builds session cookie directives with one fixed attribute set:
/// `HttpOnly; Secure; SameSite=None; Path=/; Domain=<configured>`.
#[derive(Debug, Clone)]
pub struct SessionCookieManager {
    domain: String,
    max_age: Duration,
}

impl SessionCookieManager {
    /// `access_ttl` is used as `Max-Age` unless the config pins a fixed window.
    pub fn new(config: &CookieConfig, access_ttl: chrono::Duration) -> Self {
        let max_age = match config.max_age_minutes {
            Some(minutes) => Duration::minutes(minutes as i64),
            None => Duration::seconds(access_ttl.num_seconds()),
        };
        Self {
            domain: config.domain.clone(),
            max_age,
        }
    }

    /// Clear any previous cookie, then set the new access token.
    pub fn issue(&self, access_token: &str) -> SetCookies {
        let mut cookies = self.clear();
        cookies.push(self.build(access_token.to_string(), self.max_age));
        cookies
    }

    /// Expire the cookie using the same attribute set it was issued with.
    pub fn clear(&self) -> SetCookies {
        let mut removal = self.build(String::new(), Duration::ZERO);
        removal.set_expires(OffsetDateTime::UNIX_EPOCH);
        SetCookies(vec![removal])
    }

    /// The access token sent by the client, if any.
    pub fn read(jar: &CookieJar) -> Option<String> {
        jar.get(ACCESS_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }

    fn build(&self, value: String, max_age: Duration) -> Cookie<'static> {
        Cookie::build((ACCESS_COOKIE_NAME, value))
            .http_only(true)
            .secure(true)
            .same_site(SameSite::None)
            .path("/")
            .domain(self.domain.clone())
            .max_age(max_age)
            .build()
    }
}
