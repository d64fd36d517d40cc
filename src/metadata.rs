//! Entity mapping metadata.
//!
//! [`ClassMetadata`] is what the ORM knows about one entity: which table it
//! lives in, how its fields map to columns, how it relates to other entities,
//! and where it sits in an inheritance hierarchy. The derivation engine only
//! reads it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::EntityName;

/// How an entity hierarchy is laid out in tables.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InheritanceType {
    /// No inheritance.
    #[default]
    None,
    /// Each class has its own table joined to the root by primary key.
    Joined,
    /// Every class in the hierarchy shares the root table.
    SingleTable,
    /// Each concrete class has a complete table of its own.
    TablePerClass,
}

impl InheritanceType {
    /// Upper-case mapping name, as used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Joined => "JOINED",
            Self::SingleTable => "SINGLE_TABLE",
            Self::TablePerClass => "TABLE_PER_CLASS",
        }
    }
}

impl fmt::Display for InheritanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mapped scalar field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Property name on the entity.
    pub field_name: String,
    /// Column the property is stored in.
    pub column_name: String,
}

/// Join table backing a many-to-many association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinTableMapping {
    /// Join table name. Unnamed join tables are not mirrored.
    pub name: Option<String>,
    /// Columns referencing the owning entity.
    #[serde(default)]
    pub join_columns: Vec<String>,
    /// Columns referencing the target entity.
    #[serde(default)]
    pub inverse_join_columns: Vec<String>,
}

/// A mapped association to another entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationMapping {
    /// Property name on the entity.
    pub field_name: String,
    /// Entity on the other side.
    pub target_entity: EntityName,
    /// Whether this side owns the foreign key or join table.
    pub is_owning_side: bool,
    /// Foreign key columns stored on this entity's table.
    #[serde(default)]
    pub join_columns: Vec<String>,
    /// Join table, for many-to-many associations.
    #[serde(default)]
    pub join_table: Option<JoinTableMapping>,
}

impl AssociationMapping {
    /// To-one association stored as foreign key columns on this table.
    pub fn to_one(
        field_name: impl Into<String>,
        target_entity: EntityName,
        join_columns: Vec<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            target_entity,
            is_owning_side: true,
            join_columns,
            join_table: None,
        }
    }

    /// Owning side of a many-to-many association through `join_table`.
    pub fn many_to_many(
        field_name: impl Into<String>,
        target_entity: EntityName,
        join_table: impl Into<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            target_entity,
            is_owning_side: true,
            join_columns: Vec::new(),
            join_table: Some(JoinTableMapping {
                name: Some(join_table.into()),
                join_columns: Vec::new(),
                inverse_join_columns: Vec::new(),
            }),
        }
    }

    /// Mark this association as the inverse side.
    pub fn inverse(mut self) -> Self {
        self.is_owning_side = false;
        self
    }
}

/// Mapping metadata for one entity class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMetadata {
    /// Entity class name.
    pub name: EntityName,
    /// Root of the inheritance hierarchy (the entity itself when it has none).
    pub root_entity_name: EntityName,
    /// Table name, without schema qualifier.
    pub table_name: String,
    /// Database schema the table lives in, if any.
    #[serde(default)]
    pub schema_name: Option<String>,
    /// Inheritance mapping.
    #[serde(default)]
    pub inheritance_type: InheritanceType,
    /// Every subclass in the hierarchy below this entity.
    #[serde(default)]
    pub subclasses: Vec<EntityName>,
    /// Discriminator column for single-table and joined hierarchies.
    #[serde(default)]
    pub discriminator_column: Option<String>,
    /// Scalar fields.
    #[serde(default)]
    pub field_mappings: Vec<FieldMapping>,
    /// Associations.
    #[serde(default)]
    pub association_mappings: Vec<AssociationMapping>,
}

impl ClassMetadata {
    /// Metadata for a standalone entity stored in `table_name`.
    pub fn new(name: EntityName, table_name: impl Into<String>) -> Self {
        Self {
            root_entity_name: name.clone(),
            name,
            table_name: table_name.into(),
            schema_name: None,
            inheritance_type: InheritanceType::None,
            subclasses: Vec::new(),
            discriminator_column: None,
            field_mappings: Vec::new(),
            association_mappings: Vec::new(),
        }
    }

    /// Map `field_name` to `column_name`.
    pub fn with_field(mut self, field_name: impl Into<String>, column_name: impl Into<String>) -> Self {
        self.field_mappings.push(FieldMapping {
            field_name: field_name.into(),
            column_name: column_name.into(),
        });
        self
    }

    /// Add an association.
    pub fn with_association(mut self, association: AssociationMapping) -> Self {
        self.association_mappings.push(association);
        self
    }

    /// Place this entity in an inheritance hierarchy.
    pub fn with_inheritance(
        mut self,
        inheritance_type: InheritanceType,
        root_entity_name: EntityName,
        subclasses: Vec<EntityName>,
    ) -> Self {
        self.inheritance_type = inheritance_type;
        self.root_entity_name = root_entity_name;
        self.subclasses = subclasses;
        self
    }

    /// Set the discriminator column.
    pub fn with_discriminator(mut self, column: impl Into<String>) -> Self {
        self.discriminator_column = Some(column.into());
        self
    }

    /// Set the database schema qualifier.
    pub fn with_schema(mut self, schema_name: impl Into<String>) -> Self {
        self.schema_name = Some(schema_name.into());
        self
    }

    /// Table name including the `schema.` qualifier when one is set.
    pub fn qualified_table_name(&self) -> String {
        match &self.schema_name {
            Some(schema) => format!("{schema}.{}", self.table_name),
            None => self.table_name.clone(),
        }
    }

    /// Returns `true` if `name` is a mapped scalar field.
    pub fn has_field(&self, name: &str) -> bool {
        self.field_mappings.iter().any(|f| f.field_name == name)
    }

    /// Returns `true` if `name` is a mapped association.
    pub fn has_association(&self, name: &str) -> bool {
        self.association_mappings.iter().any(|a| a.field_name == name)
    }

    /// Property stored in `column`: the scalar field mapped to it, or the
    /// association whose join column it is.
    pub fn field_for_column(&self, column: &str) -> Option<&str> {
        if let Some(field) = self
            .field_mappings
            .iter()
            .find(|f| f.column_name.eq_ignore_ascii_case(column))
        {
            return Some(&field.field_name);
        }
        self.association_mappings
            .iter()
            .find(|a| a.join_columns.iter().any(|c| c.eq_ignore_ascii_case(column)))
            .map(|a| a.field_name.as_str())
    }

    /// Returns `true` for joined-table inheritance.
    pub fn is_inheritance_type_joined(&self) -> bool {
        self.inheritance_type == InheritanceType::Joined
    }

    /// Returns `true` if this entity is the root of its hierarchy.
    pub fn is_root_entity(&self) -> bool {
        self.root_entity_name == self.name
    }

    /// Names of the join tables owned by this entity, in mapping order.
    pub fn owning_join_tables(&self) -> impl Iterator<Item = &str> {
        self.association_mappings
            .iter()
            .filter(|a| a.is_owning_side)
            .filter_map(|a| a.join_table.as_ref()?.name.as_deref())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn entity(name: &str) -> EntityName {
        EntityName::new(name).unwrap()
    }

    fn article() -> ClassMetadata {
        ClassMetadata::new(entity("Article"), "articles")
            .with_field("id", "id")
            .with_field("title", "headline")
            .with_association(AssociationMapping::to_one(
                "author",
                entity("User"),
                vec!["author_id".into()],
            ))
            .with_association(AssociationMapping::many_to_many(
                "tags",
                entity("Tag"),
                "articles_tags",
            ))
            .with_association(
                AssociationMapping::many_to_many("readers", entity("User"), "articles_readers")
                    .inverse(),
            )
    }

    #[test]
    fn field_for_column_resolves_fields_and_join_columns() {
        let cm = article();
        assert_eq!(cm.field_for_column("headline"), Some("title"));
        assert_eq!(cm.field_for_column("AUTHOR_ID"), Some("author"));
        assert_eq!(cm.field_for_column("unknown"), None);
    }

    #[test]
    fn owning_join_tables_skip_inverse_side() {
        let cm = article();
        let tables: Vec<&str> = cm.owning_join_tables().collect();
        assert_eq!(tables, vec!["articles_tags"]);
    }

    #[test]
    fn new_entity_is_its_own_root() {
        let cm = article();
        assert!(cm.is_root_entity());
        assert!(!cm.is_inheritance_type_joined());
        assert!(cm.has_field("title"));
        assert!(cm.has_association("author"));
        assert!(!cm.has_field("headline"));
    }

    #[test]
    fn qualified_table_name_includes_schema() {
        let cm = article().with_schema("blog");
        assert_eq!(cm.qualified_table_name(), "blog.articles");
    }

    #[test]
    fn inheritance_names_are_upper_case() {
        assert_eq!(InheritanceType::SingleTable.to_string(), "SINGLE_TABLE");
        assert_eq!(InheritanceType::TablePerClass.as_str(), "TABLE_PER_CLASS");
    }

    #[test]
    fn deserializes_with_defaults() {
        let cm: ClassMetadata = serde_json::from_str(
            r#"{"name":"Tag","root_entity_name":"Tag","table_name":"tags"}"#,
        )
        .unwrap();
        assert_eq!(cm.inheritance_type, InheritanceType::None);
        assert!(cm.subclasses.is_empty());
        assert!(cm.discriminator_column.is_none());
    }
}
