//! Change types stored in the revision-type column.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AuditError;

/// Width of the revision-type column. Every code fits.
pub const REVISION_TYPE_LENGTH: u32 = 4;

/// What happened to an entity in a revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RevisionType {
    /// Row created.
    #[serde(rename = "INS")]
    Insert,
    /// Row changed.
    #[serde(rename = "UPD")]
    Update,
    /// Row removed.
    #[serde(rename = "DEL")]
    Delete,
}

impl RevisionType {
    /// Code stored in the revision-type column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "INS",
            Self::Update => "UPD",
            Self::Delete => "DEL",
        }
    }
}

impl fmt::Display for RevisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RevisionType {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INS" => Ok(Self::Insert),
            "UPD" => Ok(Self::Update),
            "DEL" => Ok(Self::Delete),
            other => Err(AuditError::InvalidOption(format!(
                "unknown revision type: {other}"
            ))),
        }
    }
}
