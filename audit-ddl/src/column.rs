//! Column definitions and their option bag.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::ColumnType;

/// Length used for `string` columns that do not declare one.
pub const DEFAULT_STRING_LENGTH: u32 = 255;

/// Everything about a column except its name and type.
///
/// Mirrors the option bag accepted by [`Table::add_column`](crate::Table::add_column).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnOptions {
    /// `NOT NULL` when true.
    pub notnull: bool,
    /// Values generated by the database on insert.
    pub autoincrement: bool,
    /// Maximum length for string types.
    pub length: Option<u32>,
    /// Total digits for decimal types.
    pub precision: Option<u32>,
    /// Digits after the decimal point for decimal types.
    pub scale: u32,
    /// Unsigned integers (MySQL only).
    pub unsigned: bool,
    /// Fixed-width strings (`CHAR` instead of `VARCHAR`).
    pub fixed: bool,
    /// Literal default value.
    pub default: Option<String>,
    /// Raw SQL used instead of the rendered declaration.
    pub column_definition: Option<String>,
    /// Column comment.
    pub comment: Option<String>,
    /// Dialect-specific extras such as `charset` or `collation`.
    pub platform_options: BTreeMap<String, String>,
}

impl Default for ColumnOptions {
    fn default() -> Self {
        Self {
            notnull: true,
            autoincrement: false,
            length: None,
            precision: None,
            scale: 0,
            unsigned: false,
            fixed: false,
            default: None,
            column_definition: None,
            comment: None,
            platform_options: BTreeMap::new(),
        }
    }
}

impl ColumnOptions {
    /// Options for a column that may hold `NULL`.
    pub fn nullable() -> Self {
        Self {
            notnull: false,
            ..Self::default()
        }
    }

    /// Options with only a length set.
    pub fn with_length(length: u32) -> Self {
        Self {
            length: Some(length),
            ..Self::default()
        }
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Portable type tag.
    pub column_type: ColumnType,
    /// Nullability, sizing, defaults and platform extras.
    pub options: ColumnOptions,
}

impl Column {
    /// Create a column with default options (`NOT NULL`, no length).
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self::with_options(name, column_type, ColumnOptions::default())
    }

    /// Create a column with explicit options.
    pub fn with_options(
        name: impl Into<String>,
        column_type: ColumnType,
        options: ColumnOptions,
    ) -> Self {
        Self {
            name: name.into(),
            column_type,
            options,
        }
    }

    /// Returns `true` when this column is named `name`, ignoring ASCII case.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Effective string length, falling back to [`DEFAULT_STRING_LENGTH`].
    pub fn effective_length(&self) -> u32 {
        self.options.length.unwrap_or(DEFAULT_STRING_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_not_null() {
        let opts = ColumnOptions::default();
        assert!(opts.notnull);
        assert!(!opts.autoincrement);
        assert!(opts.length.is_none());
        assert!(opts.platform_options.is_empty());
    }

    #[test]
    fn nullable_only_flips_notnull() {
        let opts = ColumnOptions::nullable();
        assert!(!opts.notnull);
        assert_eq!(opts.scale, 0);
        assert!(!opts.fixed);
    }

    #[test]
    fn effective_length_defaults_to_255() {
        let col = Column::new("name", ColumnType::String);
        assert_eq!(col.effective_length(), 255);
        let col = Column::with_options("code", ColumnType::String, ColumnOptions::with_length(4));
        assert_eq!(col.effective_length(), 4);
    }

    #[test]
    fn name_match_ignores_case() {
        let col = Column::new("UserId", ColumnType::Integer);
        assert!(col.is_named("userid"));
        assert!(!col.is_named("user_id"));
    }
}
