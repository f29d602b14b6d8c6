//! Session lifecycle manager: login, refresh, logout and who-am-i flows.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use carlog_entity::user::ExternalProfile;

use crate::cookie::{SessionCookieManager, SetCookies};
use crate::error::{AuthError, AuthResult};
use crate::guard::AuthenticatedIdentity;
use crate::identity::IdentityResolver;
use crate::jwt::{IssuedToken, TokenClass, TokenService};
use crate::store::{IdentityStore, RefreshTokenStore};

/// A session handed to the client: the identity, the new access token and
/// the cookie directives that carry it.
#[derive(Debug, Clone)]
pub struct SessionGrant {
    /// Identity the access token was minted for.
    pub identity: AuthenticatedIdentity,
    /// The new access token.
    pub access: IssuedToken,
    /// `Set-Cookie` directives transporting the access token.
    pub cookies: SetCookies,
}

/// Composes identity upsert, token service, refresh store and cookie
/// manager into the session use cases.
#[derive(Debug, Clone)]
pub struct SessionManager {
    identities: IdentityResolver,
    identity_store: Arc<dyn IdentityStore>,
    refresh_store: Arc<dyn RefreshTokenStore>,
    tokens: Arc<TokenService>,
    cookies: SessionCookieManager,
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(
        identity_store: Arc<dyn IdentityStore>,
        refresh_store: Arc<dyn RefreshTokenStore>,
        tokens: Arc<TokenService>,
        cookies: SessionCookieManager,
    ) -> Self {
        Self {
            identities: IdentityResolver::new(Arc::clone(&identity_store)),
            identity_store,
            refresh_store,
            tokens,
            cookies,
        }
    }

    /// Completes a provider login.
    ///
    /// 1. Upsert the user by external id
    /// 2. Mint access + refresh tokens under a fresh session id
    /// 3. Overwrite the user's refresh slot
    /// 4. Issue the session cookie
    pub async fn login(&self, profile: &ExternalProfile) -> AuthResult<SessionGrant> {
        let user = self.identities.upsert(profile).await?;

        let session_id = Uuid::new_v4().to_string();
        let access = self
            .tokens
            .mint_access(&user.external_id, &user.email, &session_id)?;
        let refresh = self.tokens.mint_refresh(&user.external_id, &session_id)?;

        self.refresh_store
            .save(&user.external_id, &refresh.token)
            .await?;

        info!(
            external_id = %user.external_id,
            provider = %user.provider,
            refresh_expires_at = %refresh.expires_at,
            "Login successful"
        );

        Ok(SessionGrant {
            identity: AuthenticatedIdentity {
                external_id: user.external_id,
                email: user.email,
            },
            cookies: self.cookies.issue(&access.token),
            access,
        })
    }

    /// Issues a new access token from the stored refresh token.
    ///
    /// The access cookie is only used to learn *whose* refresh slot to
    /// read; it is usually expired by now, so its signature and expiry are
    /// not checked. Authorization rests on the stored refresh token, which
    /// must verify under the refresh secret, must belong to the same login
    /// session as the cookie and, when the client presents one, must equal
    /// the presented value. A client whose slot was overwritten by a later
    /// login is therefore refused. The refresh token itself is not rotated.
    pub async fn refresh(
        &self,
        access_cookie: Option<&str>,
        presented_refresh: Option<&str>,
    ) -> AuthResult<SessionGrant> {
        let access_cookie = access_cookie.ok_or(AuthError::NoCredential)?;
        let subject = self.tokens.insecure_peek_subject(access_cookie)?;
        let external_id = subject.as_str();

        let stored = self
            .refresh_store
            .get(external_id)
            .await?
            .ok_or_else(|| {
                warn!(external_id, "Refresh rejected: no stored refresh token");
                AuthError::RefreshMissing
            })?;

        if presented_refresh.is_some_and(|presented| presented != stored) {
            warn!(external_id, "Refresh rejected: presented token is not the current one");
            return Err(AuthError::RefreshInvalid);
        }

        let claims = self
            .tokens
            .verify(&stored, TokenClass::Refresh)
            .map_err(|e| {
                warn!(external_id, error = %e, "Refresh rejected: stored token failed verification");
                AuthError::RefreshInvalid
            })?;
        if claims.sub != external_id {
            return Err(AuthError::RefreshInvalid);
        }
        if subject.session_id() != Some(claims.session_id()) {
            warn!(external_id, "Refresh rejected: session was replaced by a newer login");
            return Err(AuthError::RefreshInvalid);
        }

        let user = self
            .identity_store
            .find_by_external_id(external_id)
            .await?
            .ok_or(AuthError::RefreshMissing)?;

        let access = self
            .tokens
            .mint_access(&user.external_id, &user.email, claims.session_id())?;
        info!(external_id, "Access token refreshed");

        Ok(SessionGrant {
            identity: AuthenticatedIdentity {
                external_id: user.external_id,
                email: user.email,
            },
            cookies: self.cookies.issue(&access.token),
            access,
        })
    }

    /// Ends the session of an authenticated caller: empties the refresh
    /// slot and returns the cookie-clearing directive.
    pub async fn logout(&self, identity: Option<&AuthenticatedIdentity>) -> AuthResult<SetCookies> {
        let identity = identity.ok_or(AuthError::Unauthenticated)?;

        self.refresh_store.clear(&identity.external_id).await?;
        info!(external_id = %identity.external_id, "Logout successful");

        Ok(self.cookies.clear())
    }

    /// Returns the caller's identity as attached by the guard.
    pub fn who_am_i(
        &self,
        identity: Option<&AuthenticatedIdentity>,
    ) -> AuthResult<AuthenticatedIdentity> {
        identity.cloned().ok_or(AuthError::Unauthenticated)
    }
}
