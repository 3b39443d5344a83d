//! Result type aliases for Aside.

use crate::AsideError;

/// A specialized `Result` type for Aside operations.
pub type AsideResult<T> = Result<T, AsideError>;
