//! Token verification failures.

use thiserror::Error;

/// Outcome of a failed mint or verify.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Signature checks out but `exp` has passed.
    #[error("token has expired")]
    Expired,
    /// Wrong secret, tampered bytes, malformed structure or wrong token class.
    #[error("invalid token signature")]
    InvalidSignature,
    /// Signing failed; never caused by caller input.
    #[error("failed to sign token: {0}")]
    Signing(String),
}
