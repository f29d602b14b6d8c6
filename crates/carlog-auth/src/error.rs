//! Authentication failure taxonomy.

use thiserror::Error;

use carlog_core::error::{AppError, ErrorKind};

use crate::jwt::TokenError;

/// Why an authentication step was rejected.
///
/// Every variant except `Internal` is a terminal rejection for the current
/// request; none are retried inside this crate.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `access_token` cookie was sent.
    #[error("No access token cookie present")]
    NoCredential,
    /// The token signature is valid but its lifetime has elapsed.
    #[error("Access token has expired")]
    Expired,
    /// The token was tampered with, malformed, or signed with another secret.
    #[error("Invalid token signature")]
    InvalidSignature,
    /// No refresh token is stored for the subject.
    #[error("Refresh token missing")]
    RefreshMissing,
    /// The stored refresh token failed verification or did not match the
    /// presented one.
    #[error("Invalid refresh token")]
    RefreshInvalid,
    /// Another request created the same external identity concurrently.
    #[error("Identity conflict: {0}")]
    IdentityConflict(String),
    /// The operation requires an authenticated identity and none is attached.
    #[error("User is not authenticated")]
    Unauthenticated,
    /// A store or signing failure unrelated to the caller's credentials.
    #[error(transparent)]
    Internal(#[from] AppError),
}

/// Result alias for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Machine-readable rejection reason.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NoCredential => "NO_CREDENTIAL",
            Self::Expired => "EXPIRED",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::RefreshMissing => "REFRESH_MISSING",
            Self::RefreshInvalid => "REFRESH_INVALID",
            Self::IdentityConflict(_) => "IDENTITY_CONFLICT",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Whether this is a credential rejection (HTTP 401 class).
    pub fn is_unauthorized(&self) -> bool {
        !matches!(self, Self::IdentityConflict(_) | Self::Internal(_))
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => Self::Expired,
            TokenError::InvalidSignature => Self::InvalidSignature,
            TokenError::Signing(message) => Self::Internal(AppError::internal(message)),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Internal(inner) => inner,
            AuthError::IdentityConflict(message) => AppError::new(ErrorKind::Conflict, message),
            other => AppError::authentication(other.to_string()),
        }
    }
}
