//! Scalar column type tags.
//!
//! [`ColumnType`] is the portable half of a column definition: it says what
//! kind of value the column holds, while [`Platform`](crate::Platform)
//! decides how that kind is spelled in a particular SQL dialect.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DdlError;

/// Portable column type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    #[serde(alias = "big_int")]
    Bigint,
    /// 16-bit integer.
    #[serde(alias = "small_int")]
    Smallint,
    /// Bounded character string (`VARCHAR`, or `CHAR` when fixed).
    String,
    /// Unbounded character data.
    Text,
    /// True/false flag.
    Boolean,
    /// Date and time without zone.
    Datetime,
    /// Calendar date.
    Date,
    /// Exact numeric with precision and scale.
    Decimal,
    /// Double precision floating point.
    Float,
    /// 36-character UUID.
    Guid,
    /// JSON document.
    Json,
    /// Binary large object.
    Blob,
    /// Closed set of string values. Rendered natively (`ENUM(...)`) only by
    /// platforms that have a native enum column type.
    Enum {
        /// Allowed values, in declaration order.
        values: Vec<String>,
    },
    /// Application-defined type with a fixed SQL declaration.
    Custom {
        /// Registry name of the type.
        name: String,
        /// SQL declaration emitted verbatim on every platform.
        declaration: String,
    },
}

impl ColumnType {
    /// Returns the registry name of this type.
    ///
    /// Built-in types have stable lowercase names; custom types report the
    /// name they were registered with.
    pub fn name(&self) -> &str {
        match self {
            Self::Integer => "integer",
            Self::Bigint => "bigint",
            Self::Smallint => "smallint",
            Self::String => "string",
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Datetime => "datetime",
            Self::Date => "date",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Guid => "guid",
            Self::Json => "json",
            Self::Blob => "blob",
            Self::Enum { .. } => "enum",
            Self::Custom { name, .. } => name,
        }
    }

    /// Returns `true` for integer-family types.
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Integer | Self::Bigint | Self::Smallint)
    }

    /// Returns `true` when literal defaults for this type are written unquoted.
    pub fn is_numeric(&self) -> bool {
        self.is_integer() || matches!(self, Self::Decimal | Self::Float)
    }

    /// Convenience constructor for [`ColumnType::Enum`].
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColumnType {
    type Err = DdlError;

    /// Looks up a built-in type by registry name.
    ///
    /// `enum` and custom types carry data and cannot be resolved from a bare
    /// name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" => Self::Integer,
            "bigint" => Self::Bigint,
            "smallint" => Self::Smallint,
            "string" => Self::String,
            "text" => Self::Text,
            "boolean" | "bool" => Self::Boolean,
            "datetime" => Self::Datetime,
            "date" => Self::Date,
            "decimal" => Self::Decimal,
            "float" => Self::Float,
            "guid" | "uuid" => Self::Guid,
            "json" => Self::Json,
            "blob" => Self::Blob,
            other => return Err(DdlError::InvalidIdentifier(format!("unknown type: {other}"))),
        };
        Ok(ty)
    }
}
