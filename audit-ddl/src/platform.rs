//! SQL dialects.
//!
//! A [`Platform`] turns the portable schema model into DDL text. Type
//! declarations are exposed separately through
//! [`Platform::column_declaration_sql`] because callers inspect them (for
//! example to detect native `ENUM` columns) without emitting a whole table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::column::{Column, ColumnOptions, DEFAULT_STRING_LENGTH};
use crate::error::DdlError;
use crate::schema::Schema;
use crate::table::{ForeignKey, Table};
use crate::types::ColumnType;

/// Precision used for `decimal` columns that do not declare one.
pub const DEFAULT_DECIMAL_PRECISION: u32 = 10;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// SQLite 3.
    Sqlite,
    /// MySQL / MariaDB with InnoDB.
    #[serde(alias = "mariadb")]
    Mysql,
    /// PostgreSQL.
    #[serde(alias = "postgres")]
    Postgresql,
}

impl Platform {
    /// Human-readable dialect name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Mysql => "mysql",
            Self::Postgresql => "postgresql",
        }
    }

    /// Quote an identifier, quoting each part of a `schema.table` name.
    pub fn quote_identifier(&self, name: &str) -> String {
        name.split('.')
            .map(|part| self.quote_single_identifier(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn quote_single_identifier(&self, part: &str) -> String {
        match self {
            Self::Mysql => format!("`{}`", part.replace('`', "``")),
            Self::Sqlite | Self::Postgresql => format!("\"{}\"", part.replace('"', "\"\"")),
        }
    }

    /// Quote a string literal.
    pub fn quote_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Render the SQL type declaration for a column of `column_type`.
    ///
    /// This is the type alone: no name, nullability, or default.
    pub fn column_declaration_sql(&self, column_type: &ColumnType, options: &ColumnOptions) -> String {
        let unsigned = if options.unsigned && *self == Self::Mysql {
            " UNSIGNED"
        } else {
            ""
        };
        match column_type {
            ColumnType::Integer => match self {
                Self::Sqlite => "INTEGER".to_owned(),
                Self::Mysql => format!("INT{unsigned}"),
                Self::Postgresql => "INT".to_owned(),
            },
            ColumnType::Bigint => format!("BIGINT{unsigned}"),
            ColumnType::Smallint => format!("SMALLINT{unsigned}"),
            ColumnType::String => string_declaration(options),
            ColumnType::Text => match self {
                Self::Sqlite => "CLOB".to_owned(),
                Self::Mysql => "LONGTEXT".to_owned(),
                Self::Postgresql => "TEXT".to_owned(),
            },
            ColumnType::Boolean => match self {
                Self::Mysql => "TINYINT(1)".to_owned(),
                Self::Sqlite | Self::Postgresql => "BOOLEAN".to_owned(),
            },
            ColumnType::Datetime => match self {
                Self::Postgresql => "TIMESTAMP(0) WITHOUT TIME ZONE".to_owned(),
                Self::Sqlite | Self::Mysql => "DATETIME".to_owned(),
            },
            ColumnType::Date => "DATE".to_owned(),
            ColumnType::Decimal => format!(
                "NUMERIC({}, {}){unsigned}",
                options.precision.unwrap_or(DEFAULT_DECIMAL_PRECISION),
                options.scale
            ),
            ColumnType::Float => format!("DOUBLE PRECISION{unsigned}"),
            ColumnType::Guid => match self {
                Self::Postgresql => "UUID".to_owned(),
                Self::Sqlite | Self::Mysql => "CHAR(36)".to_owned(),
            },
            ColumnType::Json => match self {
                Self::Sqlite => "CLOB".to_owned(),
                Self::Mysql | Self::Postgresql => "JSON".to_owned(),
            },
            ColumnType::Blob => match self {
                Self::Sqlite => "BLOB".to_owned(),
                Self::Mysql => "LONGBLOB".to_owned(),
                Self::Postgresql => "BYTEA".to_owned(),
            },
            ColumnType::Enum { values } => match self {
                Self::Mysql => {
                    let quoted: Vec<String> = values.iter().map(|v| self.quote_literal(v)).collect();
                    format!("ENUM({})", quoted.join(", "))
                }
                Self::Sqlite | Self::Postgresql => string_declaration(options),
            },
            ColumnType::Custom { declaration, .. } => declaration.clone(),
        }
    }

    /// Render one column as it appears inside `CREATE TABLE`.
    fn column_sql(&self, column: &Column, autoincrement_key: bool) -> String {
        let name = self.quote_identifier(&column.name);
        let opts = &column.options;

        if let Some(definition) = &opts.column_definition {
            return format!("{name} {definition}");
        }

        if autoincrement_key {
            return match self {
                Self::Sqlite => format!("{name} INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL"),
                Self::Mysql => format!(
                    "{name} {} AUTO_INCREMENT NOT NULL",
                    self.column_declaration_sql(&column.column_type, opts)
                ),
                Self::Postgresql => {
                    let serial = match column.column_type {
                        ColumnType::Bigint => "BIGSERIAL",
                        ColumnType::Smallint => "SMALLSERIAL",
                        _ => "SERIAL",
                    };
                    format!("{name} {serial} NOT NULL")
                }
            };
        }

        let mut sql = format!(
            "{name} {}",
            self.column_declaration_sql(&column.column_type, opts)
        );

        if *self == Self::Mysql {
            if let Some(charset) = opts.platform_options.get("charset") {
                sql.push_str(&format!(" CHARACTER SET {charset}"));
            }
        }
        if let Some(collation) = opts.platform_options.get("collation") {
            sql.push_str(&format!(" COLLATE {collation}"));
        }

        match &opts.default {
            Some(value) if column.column_type.is_numeric() || column.column_type == ColumnType::Boolean => {
                sql.push_str(&format!(" DEFAULT {value}"));
            }
            Some(value) => sql.push_str(&format!(" DEFAULT {}", self.quote_literal(value))),
            None if !opts.notnull => sql.push_str(" DEFAULT NULL"),
            None => {}
        }

        if opts.notnull {
            sql.push_str(" NOT NULL");
        }

        if *self == Self::Mysql {
            if let Some(comment) = &opts.comment {
                sql.push_str(&format!(" COMMENT {}", self.quote_literal(comment)));
            }
        }

        sql
    }

    /// The autoincrement column backing a single-column primary key,
    /// if the table has one.
    fn autoincrement_key_column<'t>(&self, table: &'t Table) -> Option<&'t Column> {
        let pk = table.primary_key()?;
        let [only] = pk.columns.as_slice() else {
            return None;
        };
        table
            .column(only)
            .filter(|c| c.options.autoincrement && c.column_type.is_integer())
    }

    fn foreign_key_clause(&self, fk: &ForeignKey) -> String {
        format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            self.quote_identifier(&fk.name),
            self.quote_list(&fk.local_columns),
            self.quote_identifier(&fk.foreign_table),
            self.quote_list(&fk.foreign_columns)
        )
    }

    fn quote_list(&self, names: &[String]) -> String {
        names
            .iter()
            .map(|n| self.quote_identifier(n))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Render `CREATE TABLE` plus its `CREATE INDEX` statements.
    ///
    /// SQLite cannot add constraints after the fact, so its foreign keys are
    /// rendered inline. The other dialects leave them to
    /// [`Platform::foreign_key_sql`].
    pub fn create_table_sql(&self, table: &Table) -> Vec<String> {
        let autoinc_pk = self.autoincrement_key_column(table);
        let mut parts: Vec<String> = table
            .columns()
            .iter()
            .map(|c| {
                let inline = autoinc_pk.is_some_and(|pk| pk.is_named(&c.name));
                self.column_sql(c, inline)
            })
            .collect();

        // SQLite declares AUTOINCREMENT keys on the column itself.
        if autoinc_pk.is_none() || *self != Self::Sqlite {
            if let Some(pk) = table.primary_key() {
                parts.push(format!("PRIMARY KEY({})", self.quote_list(&pk.columns)));
            }
        }

        if *self == Self::Sqlite {
            parts.extend(table.foreign_keys().iter().map(|fk| self.foreign_key_clause(fk)));
        }

        let table_name = self.quote_identifier(table.name());
        let mut create = format!("CREATE TABLE {table_name} ({})", parts.join(", "));
        if *self == Self::Mysql {
            create.push_str(" ENGINE = InnoDB");
        }

        let mut statements = vec![create];
        for index in table.indexes() {
            let kind = if index.unique { "UNIQUE INDEX" } else { "INDEX" };
            statements.push(format!(
                "CREATE {kind} {} ON {table_name} ({})",
                self.quote_identifier(&index.name),
                self.quote_list(&index.columns)
            ));
        }

        if *self == Self::Postgresql {
            for column in table.columns() {
                if let Some(comment) = &column.options.comment {
                    statements.push(format!(
                        "COMMENT ON COLUMN {table_name}.{} IS {}",
                        self.quote_identifier(&column.name),
                        self.quote_literal(comment)
                    ));
                }
            }
        }

        statements
    }

    /// Render `ALTER TABLE ... ADD CONSTRAINT` statements for a table's
    /// foreign keys. Empty on SQLite, where they are part of `CREATE TABLE`.
    pub fn foreign_key_sql(&self, table: &Table) -> Vec<String> {
        if *self == Self::Sqlite {
            return Vec::new();
        }
        let table_name = self.quote_identifier(table.name());
        table
            .foreign_keys()
            .iter()
            .map(|fk| format!("ALTER TABLE {table_name} ADD {}", self.foreign_key_clause(fk)))
            .collect()
    }

    /// Render DDL for every table in `schema`, in creation order, followed by
    /// the foreign keys so that every referenced table already exists.
    pub fn create_schema_sql(&self, schema: &Schema) -> Vec<String> {
        let mut statements: Vec<String> = schema
            .tables()
            .iter()
            .flat_map(|t| self.create_table_sql(t))
            .collect();
        statements.extend(schema.tables().iter().flat_map(|t| self.foreign_key_sql(t)));
        tracing::debug!(
            platform = self.name(),
            tables = schema.len(),
            statements = statements.len(),
            "rendered schema DDL"
        );
        statements
    }
}

fn string_declaration(options: &ColumnOptions) -> String {
    let length = options.length.unwrap_or(DEFAULT_STRING_LENGTH);
    if options.fixed {
        format!("CHAR({length})")
    } else {
        format!("VARCHAR({length})")
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = DdlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "mysql" | "mariadb" => Ok(Self::Mysql),
            "postgresql" | "postgres" | "pgsql" => Ok(Self::Postgresql),
            other => Err(DdlError::InvalidIdentifier(format!("unknown platform: {other}"))),
        }
    }
}
