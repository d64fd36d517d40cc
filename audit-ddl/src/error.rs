//! Error types for the audit-ddl crate.
//!
//! Every variant carries the offending identifier so callers can report
//! exactly which table or column broke the schema build.

/// Errors raised while mutating an in-memory [`Schema`](crate::Schema).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DdlError {
    /// A table with this name is already part of the schema.
    #[error("table already exists: {0}")]
    TableAlreadyExists(String),

    /// No table with this name exists in the schema.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// The table already has a column with this name.
    #[error("column already exists: {table}.{column}")]
    ColumnAlreadyExists {
        /// Table the column was added to.
        table: String,
        /// Duplicate column name.
        column: String,
    },

    /// A key or index references a column the table does not have.
    #[error("column not found: {table}.{column}")]
    ColumnNotFound {
        /// Table that was searched.
        table: String,
        /// Missing column name.
        column: String,
    },

    /// The table already has an index with this name.
    #[error("index already exists: {table}.{index}")]
    IndexAlreadyExists {
        /// Table the index was added to.
        table: String,
        /// Duplicate index name.
        index: String,
    },

    /// The table already has a foreign key with this name.
    #[error("foreign key already exists: {table}.{name}")]
    ForeignKeyAlreadyExists {
        /// Table the constraint was added to.
        table: String,
        /// Duplicate constraint name.
        name: String,
    },

    /// A foreign key references no columns, or a different number of
    /// columns than it has locally.
    #[error("invalid foreign key {table}.{name}: {local} local column(s), {foreign} referenced")]
    InvalidForeignKey {
        /// Table the constraint was added to.
        table: String,
        /// Constraint name.
        name: String,
        /// Number of local columns.
        local: usize,
        /// Number of referenced columns.
        foreign: usize,
    },

    /// An identifier was empty or otherwise unusable.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// Convenience type alias for audit-ddl results.
pub type Result<T> = std::result::Result<T, DdlError>;
