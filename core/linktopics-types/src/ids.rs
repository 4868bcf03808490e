//! Identifier types used by the license handshake.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Opaque identifier of a payment-provider checkout session
/// (e.g. `cs_test_a1B2c3`).
///
/// The value is never interpreted locally; the only guarantee is that it
/// is non-empty after trimming surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Parses a session ID, rejecting empty or whitespace-only input.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::MissingSessionId);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Builds a session ID from an optional query value.
    ///
    /// `None`, `""` and whitespace all count as a missing identifier.
    pub fn from_query(value: Option<&str>) -> Result<Self> {
        value.map_or(Err(Error::MissingSessionId), Self::parse)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SessionId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
