//! Convenience result type alias for Carlog.

use crate::error::AppError;

/// A specialized `Result` type for Carlog operations.
pub type AppResult<T> = Result<T, AppError>;
