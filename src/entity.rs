//! Validated entity identifiers.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AuditError;

/// Fully qualified entity class name, e.g. `App\Entity\User` or `app::User`.
///
/// Construction rejects empty names and names containing whitespace or
/// control characters, so a typo in configuration fails when it is set
/// instead of silently matching nothing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EntityName(String);

impl EntityName {
    /// Validate and wrap an entity name.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidOption`] if the name is empty or contains
    /// whitespace or control characters.
    pub fn new(name: impl Into<String>) -> Result<Self, AuditError> {
        let name = name.into();
        if name.is_empty() {
            return Err(AuditError::InvalidOption("entity name is empty".into()));
        }
        if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(AuditError::InvalidOption(format!(
                "entity name {name:?} contains whitespace"
            )));
        }
        Ok(Self(name))
    }

    /// The underlying name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityName {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for EntityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for EntityName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}
