//! The revisions ledger and the revision columns every audit table carries.

use audit_ddl::{ColumnOptions, ColumnType, Schema, Table};

use super::naming;
use crate::config::AuditConfiguration;
use crate::error::Result;
use crate::revision::REVISION_TYPE_LENGTH;

/// Ensure the revisions ledger exists and return it.
///
/// Idempotent: an existing table with the configured name is returned as is.
/// A new ledger has `id` (revision id type, autoincrement), `timestamp`
/// (datetime) and a nullable `username`, keyed on `id`.
///
/// # Errors
///
/// Returns a schema error only if the ledger cannot be assembled.
pub fn create_revisions_table<'s>(
    config: &AuditConfiguration,
    schema: &'s mut Schema,
) -> Result<&'s Table> {
    let name = config.revision_table_name();

    if !schema.has_table(name) {
        let table = schema.create_table(name)?;
        table.add_column(
            "id",
            config.revision_id_field_type().clone(),
            ColumnOptions {
                autoincrement: true,
                ..ColumnOptions::default()
            },
        )?;
        table.add_column("timestamp", ColumnType::Datetime, ColumnOptions::default())?;
        table.add_column("username", ColumnType::String, ColumnOptions::nullable())?;
        table.set_primary_key(&["id"])?;
        tracing::debug!(table = %name, "revisions table created");
    }

    Ok(schema.get_table(name)?)
}

/// Append the revision id and revision-type columns to `table`.
pub(crate) fn add_revision_columns(config: &AuditConfiguration, table: &mut Table) -> Result<()> {
    table.add_column(
        config.revision_field_name(),
        config.revision_id_field_type().clone(),
        ColumnOptions::default(),
    )?;
    table.add_column(
        config.revision_type_field_name(),
        ColumnType::String,
        ColumnOptions::with_length(REVISION_TYPE_LENGTH),
    )?;
    Ok(())
}

/// Key `table` on `source_key` plus the revision column, and index the
/// revision column on its own.
pub(crate) fn add_revision_key_and_index(
    config: &AuditConfiguration,
    table: &mut Table,
    mut source_key: Vec<String>,
) -> Result<()> {
    let revision_field = config.revision_field_name();
    source_key.push(revision_field.to_owned());
    table.set_primary_key(&source_key)?;

    let index_name = naming::revision_index_name(revision_field, table.name());
    table.add_index(&[revision_field], index_name)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::entity::EntityName;
    use crate::error::AuditError;
    use crate::metadata::ClassMetadata;
    use crate::schema::AuditSchemaListener;

    #[test]
    fn ledger_has_expected_shape() {
        let config = AuditConfiguration::default();
        let mut schema = Schema::new();
        let ledger = create_revisions_table(&config, &mut schema).unwrap();

        assert_eq!(ledger.name(), "revisions");
        let names: Vec<&str> = ledger.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "timestamp", "username"]);
        assert_eq!(ledger.primary_key_columns(), vec!["id".to_owned()]);

        let id = ledger.column("id").unwrap();
        assert!(id.options.autoincrement);
        assert_eq!(id.column_type, ColumnType::Integer);
        assert!(!ledger.column("username").unwrap().options.notnull);
        assert_eq!(
            ledger.column("timestamp").unwrap().column_type,
            ColumnType::Datetime
        );
    }

    #[test]
    fn ledger_creation_is_idempotent() {
        let config = AuditConfiguration::default();
        let mut schema = Schema::new();
        create_revisions_table(&config, &mut schema).unwrap();
        create_revisions_table(&config, &mut schema).unwrap();
        assert_eq!(schema.len(), 1);
    }

    #[test]
    fn existing_ledger_is_reused_untouched() {
        let mut config = AuditConfiguration::default();
        config.set_revision_table_name("history").unwrap();
        let mut schema = Schema::new();
        schema
            .create_table("history")
            .unwrap()
            .add_column("id", ColumnType::Bigint, ColumnOptions::default())
            .unwrap();

        let ledger = create_revisions_table(&config, &mut schema).unwrap();
        assert_eq!(ledger.columns().len(), 1);
        assert_eq!(schema.len(), 1);
    }

    fn keyless_ledger_schema() -> Schema {
        let mut schema = Schema::new();
        schema
            .create_table("revisions")
            .unwrap()
            .add_column("id", ColumnType::Integer, ColumnOptions::default())
            .unwrap();
        let user = schema.create_table("user").unwrap();
        user.add_column("id", ColumnType::Integer, ColumnOptions::default())
            .unwrap();
        user.set_primary_key(&["id"]).unwrap();
        schema
    }

    #[test]
    fn keyless_existing_ledger_cannot_back_foreign_keys() {
        let config = AuditConfiguration::for_entities([EntityName::new("User").unwrap()]);
        let mut schema = keyless_ledger_schema();
        let user = schema.get_table("user").unwrap().clone();
        let cm = ClassMetadata::new(EntityName::new("User").unwrap(), "user");

        let err = AuditSchemaListener::new(&config)
            .post_generate_schema_table(&cm, &user, &mut schema)
            .unwrap_err();
        assert!(matches!(err, AuditError::MissingPrimaryKey(ref t) if t == "revisions"));
        assert!(!schema.has_table("user_audit"));
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn keyless_existing_ledger_is_fine_without_foreign_keys() {
        let mut config = AuditConfiguration::for_entities([EntityName::new("User").unwrap()]);
        config.set_disabled_foreign_keys(true);
        let mut schema = keyless_ledger_schema();
        let user = schema.get_table("user").unwrap().clone();
        let cm = ClassMetadata::new(EntityName::new("User").unwrap(), "user");

        AuditSchemaListener::new(&config)
            .post_generate_schema_table(&cm, &user, &mut schema)
            .unwrap();
        assert!(schema.get_table("user_audit").unwrap().foreign_keys().is_empty());
    }

    #[test]
    fn ledger_follows_revision_id_type() {
        let mut config = AuditConfiguration::default();
        config.set_revision_id_field_type(ColumnType::Guid).unwrap();
        let mut schema = Schema::new();
        let ledger = create_revisions_table(&config, &mut schema).unwrap();
        assert_eq!(ledger.column("id").unwrap().column_type, ColumnType::Guid);
    }

    #[test]
    fn revision_columns_and_key() {
        let config = AuditConfiguration::default();
        let mut table = Table::new("user_audit").unwrap();
        table
            .add_column("id", ColumnType::Integer, ColumnOptions::nullable())
            .unwrap();
        add_revision_columns(&config, &mut table).unwrap();
        add_revision_key_and_index(&config, &mut table, vec!["id".into()]).unwrap();

        let revtype = table.column("revtype").unwrap();
        assert_eq!(revtype.column_type, ColumnType::String);
        assert_eq!(revtype.options.length, Some(4));
        assert_eq!(
            table.primary_key_columns(),
            vec!["id".to_owned(), "rev".to_owned()]
        );
        assert_eq!(
            table.indexes()[0].name,
            "rev_e06395edc291d0719bee26fd39a32e8a_idx"
        );
        assert_eq!(table.indexes()[0].columns, vec!["rev".to_owned()]);
    }
}
