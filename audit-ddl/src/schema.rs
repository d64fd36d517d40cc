//! The schema under construction.
//!
//! A [`Schema`] is an ordered set of tables. Order is creation order, which
//! is also the order DDL is emitted in.

use serde::{Deserialize, Serialize};

use crate::error::{DdlError, Result};
use crate::table::Table;

/// Ordered collection of tables, looked up by case-insensitive name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    tables: Vec<Table>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a table called `name` exists.
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t.is_named(name))
    }

    /// Look up a table by name.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::TableNotFound`] if no such table exists.
    pub fn get_table(&self, name: &str) -> Result<&Table> {
        self.tables
            .iter()
            .find(|t| t.is_named(name))
            .ok_or_else(|| DdlError::TableNotFound(name.to_owned()))
    }

    /// Look up a table by name for modification.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::TableNotFound`] if no such table exists.
    pub fn get_table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .iter_mut()
            .find(|t| t.is_named(name))
            .ok_or_else(|| DdlError::TableNotFound(name.to_owned()))
    }

    /// Create an empty table and return it for population.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::TableAlreadyExists`] if the name is taken, or
    /// [`DdlError::InvalidIdentifier`] if it is blank.
    pub fn create_table(&mut self, name: impl Into<String>) -> Result<&mut Table> {
        let table = Table::new(name)?;
        if self.has_table(table.name()) {
            return Err(DdlError::TableAlreadyExists(table.name().to_owned()));
        }
        tracing::trace!(table = %table.name(), "table created");
        self.tables.push(table);
        let last = self.tables.len() - 1;
        Ok(&mut self.tables[last])
    }

    /// Add a fully built table.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::TableAlreadyExists`] if the name is taken.
    pub fn add_table(&mut self, table: Table) -> Result<()> {
        if self.has_table(table.name()) {
            return Err(DdlError::TableAlreadyExists(table.name().to_owned()));
        }
        self.tables.push(table);
        Ok(())
    }

    /// Remove a table, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::TableNotFound`] if no such table exists.
    pub fn drop_table(&mut self, name: &str) -> Result<Table> {
        let pos = self
            .tables
            .iter()
            .position(|t| t.is_named(name))
            .ok_or_else(|| DdlError::TableNotFound(name.to_owned()))?;
        Ok(self.tables.remove(pos))
    }

    /// Tables in creation order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Table names in creation order.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(Table::name).collect()
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns `true` if the schema has no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
