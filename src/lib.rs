//! Entity audit: schema derivation for entity-level audit history.
//!
//! For every audited entity, an audit table mirrors the entity table with two
//! extra columns: the revision id and the change type (`INS`, `UPD`, `DEL`).
//! Every revision is recorded once in a shared revisions ledger.
//!
//! # Architecture
//!
//! - **Configuration** ([`AuditConfiguration`]): naming conventions,
//!   exclusions, the SQL dialect and the username provider. Loaded from TOML
//!   through [`AuditOptions`] or built in code.
//! - **Registry** ([`AuditRegistry`]): which entities are audited.
//! - **Derivation** ([`AuditSchemaListener`]): adds audit tables, the ledger
//!   and join-table mirrors to an `audit_ddl::Schema` under construction.
//!
//! [`build_audit_schema`] drives a whole build from a list of entity
//! metadata, visiting each entity table and finalizing once at the end.
//!
//! ```no_run
//! use audit_ddl::{ColumnOptions, ColumnType, Platform, Schema};
//! use entity_audit::{build_audit_schema, AuditConfiguration, ClassMetadata, EntityName};
//!
//! # fn main() -> entity_audit::Result<()> {
//! let user = EntityName::new("User")?;
//! let config = AuditConfiguration::for_entities([user.clone()]);
//!
//! let mut schema = Schema::new();
//! let table = schema.create_table("user")?;
//! table.add_column("id", ColumnType::Integer, ColumnOptions::default())?;
//! table.add_column("name", ColumnType::String, ColumnOptions::default())?;
//! table.set_primary_key(&["id"])?;
//!
//! let metadata = ClassMetadata::new(user, "user")
//!     .with_field("id", "id")
//!     .with_field("name", "name");
//! build_audit_schema(&config, &[metadata], &mut schema)?;
//!
//! for statement in Platform::Sqlite.create_schema_sql(&schema) {
//!     println!("{statement};");
//! }
//! # Ok(())
//! # }
//! ```

pub mod actor;
pub mod config;
pub mod entity;
pub mod error;
pub mod metadata;
pub mod registry;
pub mod revision;
pub mod schema;

pub use actor::{ActorFn, AnonymousActor, CurrentActorProvider, EnvActor, FixedActor};
pub use config::{AuditConfiguration, AuditOptions};
pub use entity::EntityName;
pub use error::{AuditError, Result};
pub use metadata::{AssociationMapping, ClassMetadata, FieldMapping, InheritanceType, JoinTableMapping};
pub use registry::AuditRegistry;
pub use revision::{RevisionType, REVISION_TYPE_LENGTH};
pub use schema::{
    create_revision_join_table, create_revisions_table, revision_foreign_key_name,
    revision_index_name, AuditSchemaListener,
};

use audit_ddl::Schema;

/// Derive the audit schema for `entities` into `schema`.
///
/// Each entity's table must already be in `schema` under its qualified name.
/// Entities are visited in slice order; single-table subclasses are skipped
/// because they share their root's table. The revisions ledger and deferred
/// join-table mirrors are settled at the end.
///
/// # Errors
///
/// Stops at the first failing entity. `schema` keeps whatever was added
/// before the failure and should be discarded.
pub fn build_audit_schema(
    config: &AuditConfiguration,
    entities: &[ClassMetadata],
    schema: &mut Schema,
) -> Result<()> {
    let mut listener = AuditSchemaListener::new(config);

    for cm in entities {
        if cm.inheritance_type == InheritanceType::SingleTable && !cm.is_root_entity() {
            continue;
        }
        if !listener.is_auditable(cm) {
            continue;
        }
        let entity_table = schema.get_table(&cm.qualified_table_name())?.clone();
        listener.post_generate_schema_table(cm, &entity_table, schema)?;
    }

    listener.post_generate_schema(schema)?;
    tracing::info!(
        audited = listener.registry().len(),
        entities = entities.len(),
        "audit schema built"
    );
    Ok(())
}
