//! Typed identifier for user records.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifier assigned by the origin store on insert.
///
/// Ids are auto-incremented integers and never change after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Wraps a raw store identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Parses a user ID from a string.
    pub fn parse(s: &str) -> Result<Self, ParseIntError> {
        s.trim().parse::<i64>().map(Self)
    }

    /// Returns the inner integer.
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(UserId::parse("42").unwrap(), UserId(42));
        assert_eq!(UserId::parse(" 7 ").unwrap(), UserId(7));
        assert!(UserId::parse("abc").is_err());
        assert!(UserId::parse("").is_err());
    }

    #[test]
    fn test_display_and_serde() {
        let id = UserId::new(1);
        assert_eq!(id.to_string(), "1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "1");
        let back: UserId = serde_json::from_str("1").unwrap();
        assert_eq!(back, id);
    }
}
