//! Random note identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::{Uuid, Variant, Version};

use crate::error::ValidationError;

/// Length of the canonical hyphenated form.
const CANONICAL_LEN: usize = 36;

/// Identifier of a stored note: an RFC 4122 version 4 (random) UUID.
///
/// Always rendered in canonical lowercase hyphenated form. Two ids are equal
/// iff their canonical strings are equal, and they order by raw bytes, which
/// matches the lexicographic order of the canonical strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteId(Uuid);

impl NoteId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a hyphenated UUID string, accepting only random (v4) UUIDs.
    ///
    /// Hex digits may be upper or lower case; braced, URN, and unhyphenated
    /// forms are rejected.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        if value.len() != CANONICAL_LEN {
            return Err(ValidationError::InvalidId {
                value: value.to_string(),
                reason: format!("expected {} characters", CANONICAL_LEN),
            });
        }

        let uuid = Uuid::parse_str(value).map_err(|e| ValidationError::InvalidId {
            value: value.to_string(),
            reason: e.to_string(),
        })?;

        if uuid.get_version() != Some(Version::Random) || uuid.get_variant() != Variant::RFC4122 {
            return Err(ValidationError::NotRandomId {
                value: value.to_string(),
            });
        }

        Ok(Self(uuid))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for NoteId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for NoteId {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for NoteId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NoteId> for String {
    fn from(id: NoteId) -> Self {
        id.to_string()
    }
}
