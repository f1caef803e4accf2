//! Convenience result type alias.

use crate::error::AppError;

/// A specialized `Result` type for Cherry operations.
///
/// Every crate returns this instead of spelling out `Result<T, AppError>`.
pub type AppResult<T> = Result<T, AppError>;
