//! Table definitions: columns, keys, indexes and foreign keys.

use serde::{Deserialize, Serialize};

use crate::column::{Column, ColumnOptions};
use crate::error::{DdlError, Result};
use crate::types::ColumnType;

/// Primary key over one or more columns, in key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKey {
    /// Key columns.
    pub columns: Vec<String>,
}

/// Secondary index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Index name, unique within its table.
    pub name: String,
    /// Indexed columns, in order.
    pub columns: Vec<String>,
    /// `UNIQUE` index when true.
    pub unique: bool,
}

/// Foreign key constraint from this table to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Constraint name.
    pub name: String,
    /// Referencing columns on the owning table.
    pub local_columns: Vec<String>,
    /// Referenced table.
    pub foreign_table: String,
    /// Referenced columns on the foreign table.
    pub foreign_columns: Vec<String>,
}

/// A table in a [`Schema`](crate::Schema).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    primary_key: Option<PrimaryKey>,
    indexes: Vec<Index>,
    foreign_keys: Vec<ForeignKey>,
}

impl Table {
    /// Create an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::InvalidIdentifier`] if `name` is blank.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DdlError::InvalidIdentifier("table name is empty".into()));
        }
        Ok(Self {
            name,
            columns: Vec::new(),
            primary_key: None,
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
        })
    }

    /// Table name, including any `schema.` qualifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` when this table is named `name`, ignoring ASCII case.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns `true` if the table has a column called `name`.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.is_named(name))
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_named(name))
    }

    /// Look up a column by name for modification.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.is_named(name))
    }

    /// Append a column and return it for further adjustment.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::ColumnAlreadyExists`] on a duplicate name, or
    /// [`DdlError::InvalidIdentifier`] if `name` is blank.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        column_type: ColumnType,
        options: ColumnOptions,
    ) -> Result<&mut Column> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DdlError::InvalidIdentifier(format!(
                "empty column name on {}",
                self.name
            )));
        }
        if self.has_column(&name) {
            return Err(DdlError::ColumnAlreadyExists {
                table: self.name.clone(),
                column: name,
            });
        }
        self.columns
            .push(Column::with_options(name, column_type, options));
        let last = self.columns.len() - 1;
        Ok(&mut self.columns[last])
    }

    /// The primary key, if one has been set.
    pub fn primary_key(&self) -> Option<&PrimaryKey> {
        self.primary_key.as_ref()
    }

    /// Primary key column names, or an empty list when the table has none.
    pub fn primary_key_columns(&self) -> Vec<String> {
        self.primary_key
            .as_ref()
            .map(|pk| pk.columns.clone())
            .unwrap_or_default()
    }

    /// Set the primary key, replacing any previous one.
    ///
    /// Key columns become `NOT NULL`, as every SQL dialect requires.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::ColumnNotFound`] if a key column does not exist.
    pub fn set_primary_key<S: AsRef<str>>(&mut self, columns: &[S]) -> Result<()> {
        self.ensure_columns(columns)?;
        for name in columns {
            if let Some(col) = self.column_mut(name.as_ref()) {
                col.options.notnull = true;
            }
        }
        self.primary_key = Some(PrimaryKey {
            columns: columns.iter().map(|c| c.as_ref().to_owned()).collect(),
        });
        Ok(())
    }

    /// Secondary indexes in creation order.
    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    /// Look up an index by name.
    pub fn index(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|i| i.name.eq_ignore_ascii_case(name))
    }

    /// Add a non-unique index.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::IndexAlreadyExists`] on a duplicate name, or
    /// [`DdlError::ColumnNotFound`] if a column does not exist.
    pub fn add_index<S: AsRef<str>>(&mut self, columns: &[S], name: impl Into<String>) -> Result<()> {
        self.push_index(columns, name.into(), false)
    }

    /// Add a `UNIQUE` index.
    ///
    /// # Errors
    ///
    /// Same as [`Table::add_index`].
    pub fn add_unique_index<S: AsRef<str>>(
        &mut self,
        columns: &[S],
        name: impl Into<String>,
    ) -> Result<()> {
        self.push_index(columns, name.into(), true)
    }

    /// Foreign keys in creation order.
    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    /// Add a foreign key from `local_columns` to `foreign_columns` on
    /// `foreign_table`.
    ///
    /// The referenced table is not checked here; it may be created later in
    /// the same schema build.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::ForeignKeyAlreadyExists`] if the constraint name
    /// is taken, [`DdlError::ColumnNotFound`] for an unknown local column, or
    /// [`DdlError::InvalidForeignKey`] when the column lists are empty or
    /// differ in length.
    pub fn add_foreign_key_constraint<S: AsRef<str>, T: AsRef<str>>(
        &mut self,
        foreign_table: impl Into<String>,
        local_columns: &[S],
        foreign_columns: &[T],
        name: impl Into<String>,
    ) -> Result<()> {
        let name = name.into();
        if local_columns.is_empty() || local_columns.len() != foreign_columns.len() {
            return Err(DdlError::InvalidForeignKey {
                table: self.name.clone(),
                name,
                local: local_columns.len(),
                foreign: foreign_columns.len(),
            });
        }
        self.ensure_columns(local_columns)?;
        if self
            .foreign_keys
            .iter()
            .any(|fk| fk.name.eq_ignore_ascii_case(&name))
        {
            return Err(DdlError::ForeignKeyAlreadyExists {
                table: self.name.clone(),
                name,
            });
        }
        self.foreign_keys.push(ForeignKey {
            name,
            local_columns: local_columns.iter().map(|c| c.as_ref().to_owned()).collect(),
            foreign_table: foreign_table.into(),
            foreign_columns: foreign_columns
                .iter()
                .map(|c| c.as_ref().to_owned())
                .collect(),
        });
        Ok(())
    }

    fn push_index<S: AsRef<str>>(&mut self, columns: &[S], name: String, unique: bool) -> Result<()> {
        if name.trim().is_empty() {
            return Err(DdlError::InvalidIdentifier(format!(
                "empty index name on {}",
                self.name
            )));
        }
        self.ensure_columns(columns)?;
        if self.index(&name).is_some() {
            return Err(DdlError::IndexAlreadyExists {
                table: self.name.clone(),
                index: name,
            });
        }
        self.indexes.push(Index {
            name,
            columns: columns.iter().map(|c| c.as_ref().to_owned()).collect(),
            unique,
        });
        Ok(())
    }

    fn ensure_columns<S: AsRef<str>>(&self, columns: &[S]) -> Result<()> {
        match columns.iter().find(|c| !self.has_column(c.as_ref())) {
            Some(missing) => Err(DdlError::ColumnNotFound {
                table: self.name.clone(),
                column: missing.as_ref().to_owned(),
            }),
            None => Ok(()),
        }
    }
}
