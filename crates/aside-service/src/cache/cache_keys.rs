//! Cache key generators for consistent key naming.

/// Namespace for user name entries.
pub const USER_KEY_PREFIX: &str = "user:";

/// Generate the cache key for a user lookup.
///
/// The identifier is used verbatim, exactly as it arrived in the request.
#[must_use]
pub fn user_by_id(id: &str) -> String {
    format!("{}{}", USER_KEY_PREFIX, id)
}
