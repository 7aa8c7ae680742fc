use serde::Serialize;
use std::fmt;

use crate::error::{Error, Result};

/// An RFID tag identifier in normalized form
///
/// Tag readers emit 10 ASCII-hex characters. Every identifier is trimmed,
/// uppercased and truncated to at most [`Identifier::CANONICAL_LEN`]
/// characters before it is looked up or persisted. Scan evaluation keeps
/// short or empty values so junk input still lands in the audit trail;
/// registration refuses them via [`Identifier::parse_canonical`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Length of a well-formed tag identifier
    pub const CANONICAL_LEN: usize = 10;

    /// Normalize raw reader input without any length check
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_uppercase().chars().take(Self::CANONICAL_LEN).collect())
    }

    /// Normalize raw input, rejecting anything shorter than a full identifier
    ///
    /// Longer input is truncated silently.
    pub fn parse_canonical(raw: &str) -> Result<Self> {
        let upper = raw.trim().to_uppercase();
        let length = upper.chars().count();
        if length < Self::CANONICAL_LEN {
            return Err(Error::InvalidIdentifier { length });
        }

        Ok(Self(upper.chars().take(Self::CANONICAL_LEN).collect()))
    }

    /// Wrap a value that was normalized before it was persisted
    pub fn from_persisted(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this identifier has the full canonical length
    pub fn is_canonical(&self) -> bool {
        self.0.chars().count() == Self::CANONICAL_LEN
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
