//! Convenience result type alias for Staffgate.

use crate::error::AppError;

/// A specialized `Result` type for Staffgate operations.
pub type AppResult<T> = Result<T, AppError>;
