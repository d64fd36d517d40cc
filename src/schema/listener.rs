//! Per-table audit derivation and the post-build finalization pass.
//!
//! The schema-build orchestrator calls [`AuditSchemaListener::post_generate_schema_table`]
//! once for every entity table it generates, then
//! [`AuditSchemaListener::post_generate_schema`] exactly once when every entity
//! has been visited. Join tables that did not exist yet when their owning
//! entity was visited are queued on the listener and mirrored during
//! finalization.

use std::mem;

use audit_ddl::{Column, ColumnOptions, ColumnType, DdlError, Platform, Schema, Table};

use super::join_table::create_revision_join_table;
use super::naming;
use super::revisions::{add_revision_columns, add_revision_key_and_index, create_revisions_table};
use crate::config::AuditConfiguration;
use crate::error::{AuditError, Result};
use crate::metadata::{ClassMetadata, InheritanceType};
use crate::registry::AuditRegistry;

/// Derives audit tables for one schema build.
///
/// A listener owns the deferred join-table queue for the build it serves;
/// create a fresh one per build.
#[derive(Debug)]
pub struct AuditSchemaListener<'c> {
    config: &'c AuditConfiguration,
    registry: AuditRegistry,
    deferred_join_tables: Vec<String>,
}

impl<'c> AuditSchemaListener<'c> {
    /// Listener for `config`, with the registry built from its audited
    /// entity list.
    pub fn new(config: &'c AuditConfiguration) -> Self {
        Self {
            registry: config.create_registry(),
            config,
            deferred_join_tables: Vec::new(),
        }
    }

    /// The registry deciding which entities are audited.
    pub fn registry(&self) -> &AuditRegistry {
        &self.registry
    }

    /// Join tables waiting for finalization, in the order they were met.
    pub fn deferred_join_tables(&self) -> &[String] {
        &self.deferred_join_tables
    }

    /// Whether `cm` gets an audit table.
    ///
    /// True when the entity is audited itself, or when it is the root of a
    /// joined hierarchy with at least one audited subclass.
    pub fn is_auditable(&self, cm: &ClassMetadata) -> bool {
        if self.registry.is_audited(&cm.name) {
            return true;
        }
        cm.is_inheritance_type_joined()
            && cm.is_root_entity()
            && self.registry.any_audited(&cm.subclasses)
    }

    /// Derive the audit table for the entity described by `cm`, whose
    /// generated table is `entity_table`.
    ///
    /// Entities that are not auditable are left alone. Otherwise the
    /// revisions ledger is ensured, the audit table is added to `schema`,
    /// and owned join tables are mirrored or queued.
    ///
    /// # Errors
    ///
    /// - [`AuditError::UnsupportedInheritance`] for a table-per-class entity.
    /// - [`AuditError::MissingPrimaryKey`] if `entity_table` has no key, or if
    ///   foreign keys are enabled and an existing revisions ledger has none.
    /// - [`AuditError::ConfigurationMissing`] if enum conversion is on
    ///   without a platform.
    /// - [`AuditError::Ddl`] if the audit table name is taken or a source
    ///   column clashes with a revision column.
    ///
    /// Nothing is added to `schema` for the entity when any of these occur.
    pub fn post_generate_schema_table(
        &mut self,
        cm: &ClassMetadata,
        entity_table: &Table,
        schema: &mut Schema,
    ) -> Result<()> {
        if !self.is_auditable(cm) {
            tracing::trace!(entity = %cm.name, "entity not audited, skipping");
            return Ok(());
        }

        match cm.inheritance_type {
            InheritanceType::None | InheritanceType::Joined | InheritanceType::SingleTable => {}
            other => return Err(AuditError::UnsupportedInheritance(other.as_str().to_owned())),
        }
        let source_key = entity_table.primary_key_columns();
        if source_key.is_empty() {
            return Err(AuditError::MissingPrimaryKey(entity_table.name().to_owned()));
        }
        let platform = self.config.database_platform()?;

        let audit_name = self.config.audit_table_name_for(entity_table.name());
        if schema.has_table(&audit_name) {
            return Err(DdlError::TableAlreadyExists(audit_name).into());
        }
        let mut audit_table = Table::new(audit_name)?;
        for column in entity_table.columns() {
            if self.is_ignored_column(cm, column) {
                tracing::trace!(entity = %cm.name, column = %column.name, "ignored column skipped");
                continue;
            }
            self.copy_column(column, &mut audit_table, platform)?;
        }
        add_revision_columns(self.config, &mut audit_table)?;
        add_revision_key_and_index(self.config, &mut audit_table, source_key)?;

        // A ledger created here always has a key; only a pre-existing one can lack it.
        let ledger_key = create_revisions_table(self.config, schema)?.primary_key_columns();
        if !self.config.are_foreign_keys_disabled() {
            if ledger_key.is_empty() {
                return Err(AuditError::MissingPrimaryKey(
                    self.config.revision_table_name().to_owned(),
                ));
            }
            let revision_field = self.config.revision_field_name();
            let fk_name = naming::revision_foreign_key_name(revision_field, audit_table.name());
            audit_table.add_foreign_key_constraint(
                self.config.revision_table_name(),
                &[revision_field],
                &ledger_key,
                fk_name,
            )?;
        }

        tracing::debug!(
            entity = %cm.name,
            table = %audit_table.name(),
            columns = audit_table.columns().len(),
            "audit table derived"
        );
        schema.add_table(audit_table)?;

        for join_table in cm.owning_join_tables() {
            if schema.has_table(join_table) {
                create_revision_join_table(self.config, schema, join_table)?;
            } else {
                tracing::debug!(entity = %cm.name, join_table, "join table not generated yet, deferring");
                self.deferred_join_tables.push(join_table.to_owned());
            }
        }
        Ok(())
    }

    /// Finish the build: ensure the revisions ledger exists and mirror every
    /// deferred join table, in the order they were deferred.
    ///
    /// The deferred queue is drained, so a second call only re-checks the
    /// ledger.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Ddl`] if a deferred join table never made it into
    /// `schema`.
    pub fn post_generate_schema(&mut self, schema: &mut Schema) -> Result<()> {
        create_revisions_table(self.config, schema)?;

        let deferred = mem::take(&mut self.deferred_join_tables);
        let mut mirrored = 0usize;
        for join_table in &deferred {
            if create_revision_join_table(self.config, schema, join_table)? {
                mirrored += 1;
            }
        }

        tracing::info!(
            deferred = deferred.len(),
            mirrored,
            tables = schema.len(),
            "audit schema finalized"
        );
        Ok(())
    }

    /// A column is left out when its property is ignored on any subclass, or
    /// ignored on the entity itself outside a discriminated hierarchy.
    fn is_ignored_column(&self, cm: &ClassMetadata, column: &Column) -> bool {
        let property = cm.field_for_column(&column.name).unwrap_or(column.name.as_str());

        if cm
            .subclasses
            .iter()
            .any(|sub| self.config.is_entity_ignored_property(sub, property))
        {
            return true;
        }
        cm.discriminator_column.is_none() && self.config.is_entity_ignored_property(&cm.name, property)
    }

    /// Copy `column` with all of its options except nullability and
    /// autoincrement, which are always off in an audit table.
    fn copy_column(&self, column: &Column, target: &mut Table, platform: Option<Platform>) -> Result<()> {
        let mut column_type = column.column_type.clone();
        if let Some(platform) = platform {
            let declaration = platform.column_declaration_sql(&column.column_type, &column.options);
            if self.config.convert_enum_to_string() && declaration.contains("ENUM") {
                tracing::trace!(column = %column.name, %declaration, "enum column stored as string");
                column_type = ColumnType::String;
            }
        }

        target.add_column(
            column.name.clone(),
            column_type,
            ColumnOptions {
                notnull: false,
                autoincrement: false,
                ..column.options.clone()
            },
        )?;
        Ok(())
    }
}
