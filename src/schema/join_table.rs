//! Audit mirrors of many-to-many join tables.

use audit_ddl::{ColumnOptions, Schema, Table};

use super::revisions::{add_revision_columns, add_revision_key_and_index};
use crate::config::AuditConfiguration;
use crate::error::Result;

/// Create the audit mirror of `join_table_name`.
///
/// Each join column is copied by type only, nullable and without
/// autoincrement. The mirror is keyed on the join table's key (if any) plus
/// the revision column and gets the usual revision index. It gets no
/// foreign key to the revisions ledger.
///
/// Returns `false` without changes when the mirror already exists.
///
/// # Errors
///
/// Returns [`DdlError::TableNotFound`](audit_ddl::DdlError::TableNotFound)
/// if the join table is not in `schema`.
pub fn create_revision_join_table(
    config: &AuditConfiguration,
    schema: &mut Schema,
    join_table_name: &str,
) -> Result<bool> {
    let mirror = {
        let join_table = schema.get_table(join_table_name)?;
        let mirror_name = config.audit_table_name_for(join_table.name());
        if schema.has_table(&mirror_name) {
            return Ok(false);
        }

        let mut mirror = Table::new(mirror_name)?;
        for column in join_table.columns() {
            mirror.add_column(
                column.name.clone(),
                column.column_type.clone(),
                ColumnOptions {
                    notnull: false,
                    autoincrement: false,
                    ..ColumnOptions::default()
                },
            )?;
        }
        add_revision_columns(config, &mut mirror)?;
        add_revision_key_and_index(config, &mut mirror, join_table.primary_key_columns())?;
        mirror
    };

    tracing::debug!(
        join_table = %join_table_name,
        table = %mirror.name(),
        "join table audit mirror created"
    );
    schema.add_table(mirror)?;
    Ok(true)
}
