//! # carlog-auth
//!
//! Session authentication for Carlog.
//!
//! ## Modules
//!
//! - `jwt`: access/refresh token minting and verification
//! - `store`: identity store and single-slot refresh token store
//! - `identity`: create-or-update of users from provider profiles
//! - `cookie`: `access_token` cookie issue/clear directives
//! - `guard`: per-request access token check
//! - `session`: login, refresh, logout and who-am-i flows
//! - `oauth`: identity provider adapters

pub mod clock;
pub mod cookie;
pub mod error;
pub mod guard;
pub mod identity;
pub mod jwt;
pub mod oauth;
pub mod session;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use cookie::{ACCESS_COOKIE_NAME, SessionCookieManager, SetCookies};
pub use error::{AuthError, AuthResult};
pub use guard::{AuthGuard, AuthenticatedIdentity};
pub use identity::IdentityResolver;
pub use jwt::{Claims, TokenClass, TokenService};
pub use oauth::{GoogleProvider, IdentityProvider};
pub use session::{SessionGrant, SessionManager};
pub use store::{IdentityStore, MemoryUserStore, PgUserStore, RefreshTokenStore};
