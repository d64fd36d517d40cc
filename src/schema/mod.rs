//! Audit schema derivation.
//!
//! Given the tables an ORM generates for its entities, this module adds:
//!
//! - one audit table per audited entity (`prefix + table + suffix`), keyed on
//!   the entity key plus the revision column;
//! - the shared revisions ledger;
//! - audit mirrors of the many-to-many join tables audited entities own.

mod join_table;
mod listener;
mod naming;
mod revisions;

pub use join_table::create_revision_join_table;
pub use listener::AuditSchemaListener;
pub use naming::{revision_foreign_key_name, revision_index_name};
pub use revisions::create_revisions_table;
