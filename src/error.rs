//! Error types for audit schema derivation.
//!
//! Every error aborts the current schema build. Derivation is deterministic,
//! so retrying with the same input fails the same way; fix the configuration
//! or metadata and rebuild from scratch.

use audit_ddl::DdlError;

/// Top-level error type for entity-audit.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// A setting required by another enabled setting was never provided.
    #[error("Config \"{0}\" must be set.")]
    ConfigurationMissing(String),

    /// The entity uses an inheritance mapping that audit tables cannot mirror.
    #[error("Inheritance type \"{0}\" is not yet supported")]
    UnsupportedInheritance(String),

    /// A configuration value was rejected when it was set.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// A username provider could not be resolved.
    #[error("invalid callable: {0}")]
    InvalidCallable(String),

    /// The source table has no primary key to extend with the revision column.
    #[error("table \"{0}\" has no primary key")]
    MissingPrimaryKey(String),

    /// Schema model rejected a mutation.
    #[error("schema error: {0}")]
    Ddl(#[from] DdlError),

    /// Configuration file could not be parsed or serialized.
    #[error("parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AuditError>;
