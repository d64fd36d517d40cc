//! # audit-ddl
//!
//! In-memory relational schema model used by `entity-audit` to build audit
//! tables before any SQL is written.
//!
//! ## Design
//!
//! - [`Schema`] owns an ordered list of [`Table`]s; lookups ignore ASCII case
//! - [`Table`] holds [`Column`]s, an optional [`PrimaryKey`], [`Index`]es and
//!   [`ForeignKey`]s, and validates every reference when it is added
//! - [`ColumnType`] is a portable type tag with a stable registry name
//! - [`Platform`] renders type declarations and `CREATE TABLE` DDL for
//!   SQLite, MySQL and PostgreSQL
//!
//! Nothing here touches a database connection.

pub mod column;
pub mod error;
pub mod platform;
pub mod schema;
pub mod table;
pub mod types;

pub use column::{Column, ColumnOptions, DEFAULT_STRING_LENGTH};
pub use error::{DdlError, Result};
pub use platform::Platform;
pub use schema::Schema;
pub use table::{ForeignKey, Index, PrimaryKey, Table};
pub use types::ColumnType;
