//! Convenience result type alias for DocPortal.

use crate::error::AppError;

/// A specialized `Result` type for DocPortal operations.
pub type AppResult<T> = Result<T, AppError>;
