//! Audit configuration.
//!
//! [`AuditConfiguration`] is the typed, validated settings object shared by
//! every part of the schema build. It can be assembled programmatically with
//! [`AuditConfiguration::for_entities`] and the `set_*` methods, or loaded
//! from a TOML [`AuditOptions`] bundle. Setters validate immediately, so a
//! bad value fails where it was set rather than halfway through a build.

use audit_ddl::{ColumnType, Platform};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::actor::{ActorDebug, AnonymousActor, CurrentActorProvider, EnvActor, FixedActor};
use crate::entity::EntityName;
use crate::error::{AuditError, Result};
use crate::metadata::ClassMetadata;
use crate::registry::AuditRegistry;

/// Config key reported when enum conversion is enabled without a platform.
const DATABASE_PLATFORM_KEY: &str = "databasePlatform";

// ---------------------------------------------------------------------------
// Options bundle
// ---------------------------------------------------------------------------

/// Serializable form of [`AuditConfiguration`].
///
/// Missing fields take the same defaults as [`AuditConfiguration::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditOptions {
    /// Entity classes whose changes are audited.
    pub audited_entities: Vec<String>,
    /// Prepended to every audit table name.
    pub table_prefix: String,
    /// Appended to every audit table name.
    pub table_suffix: String,
    /// Name of the revisions ledger table.
    pub revision_table_name: String,
    /// Revision id column added to every audit table.
    pub revision_field_name: String,
    /// Change-type column added to every audit table.
    pub revision_type_field_name: String,
    /// Type of the revision id column and the ledger's primary key.
    pub revision_id_field_type: ColumnType,
    /// Skip foreign keys from audit tables to the revisions ledger.
    pub disable_foreign_keys: bool,
    /// Store native `ENUM` columns as plain strings in audit tables.
    pub convert_enum_to_string: bool,
    /// SQL dialect. Required when `convert_enum_to_string` is set.
    pub platform: Option<Platform>,
    /// Columns ignored when deciding whether a change is worth a revision.
    pub global_ignore_columns: Vec<String>,
    /// Properties left out of an entity's audit table, keyed by entity.
    pub entity_ignored_properties: BTreeMap<String, Vec<String>>,
    /// Username provider: `anonymous`, `fixed:<username>` or `env:<VARIABLE>`.
    pub username_provider: Option<String>,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            audited_entities: Vec::new(),
            table_prefix: String::new(),
            table_suffix: "_audit".to_owned(),
            revision_table_name: "revisions".to_owned(),
            revision_field_name: "rev".to_owned(),
            revision_type_field_name: "revtype".to_owned(),
            revision_id_field_type: ColumnType::Integer,
            disable_foreign_keys: false,
            convert_enum_to_string: false,
            platform: None,
            global_ignore_columns: Vec::new(),
            entity_ignored_properties: BTreeMap::new(),
            username_provider: None,
        }
    }
}

impl AuditOptions {
    /// Parse options from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Parse`] if the text is not valid TOML for this
    /// structure.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AuditError::Parse(e.to_string()))
    }

    /// Load options from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save options to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the options cannot
    /// be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| AuditError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Validated configuration
// ---------------------------------------------------------------------------

/// Naming conventions, exclusions and dialect for audit schema derivation.
///
/// Treat as read-only once a schema build starts.
#[derive(Clone)]
pub struct AuditConfiguration {
    audited_entities: Vec<EntityName>,
    disable_foreign_keys: bool,
    entity_ignored_properties: BTreeMap<EntityName, BTreeSet<String>>,
    global_ignore_columns: BTreeSet<String>,
    table_prefix: String,
    table_suffix: String,
    revision_table_name: String,
    revision_field_name: String,
    revision_type_field_name: String,
    revision_id_field_type: ColumnType,
    convert_enum_to_string: bool,
    database_platform: Option<Platform>,
    actor: Arc<dyn CurrentActorProvider>,
}

impl Default for AuditConfiguration {
    fn default() -> Self {
        Self {
            audited_entities: Vec::new(),
            disable_foreign_keys: false,
            entity_ignored_properties: BTreeMap::new(),
            global_ignore_columns: BTreeSet::new(),
            table_prefix: String::new(),
            table_suffix: "_audit".to_owned(),
            revision_table_name: "revisions".to_owned(),
            revision_field_name: "rev".to_owned(),
            revision_type_field_name: "revtype".to_owned(),
            revision_id_field_type: ColumnType::Integer,
            convert_enum_to_string: false,
            database_platform: None,
            actor: Arc::new(AnonymousActor),
        }
    }
}

impl fmt::Debug for AuditConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditConfiguration")
            .field("audited_entities", &self.audited_entities)
            .field("disable_foreign_keys", &self.disable_foreign_keys)
            .field("entity_ignored_properties", &self.entity_ignored_properties)
            .field("global_ignore_columns", &self.global_ignore_columns)
            .field("table_prefix", &self.table_prefix)
            .field("table_suffix", &self.table_suffix)
            .field("revision_table_name", &self.revision_table_name)
            .field("revision_field_name", &self.revision_field_name)
            .field("revision_type_field_name", &self.revision_type_field_name)
            .field("revision_id_field_type", &self.revision_id_field_type)
            .field("convert_enum_to_string", &self.convert_enum_to_string)
            .field("database_platform", &self.database_platform)
            .field("actor", &ActorDebug(self.actor.as_ref()))
            .finish()
    }
}

impl AuditConfiguration {
    /// Default configuration auditing `entities`.
    pub fn for_entities<I>(entities: I) -> Self
    where
        I: IntoIterator<Item = EntityName>,
    {
        Self {
            audited_entities: entities.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Build and validate a configuration from an options bundle.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidOption`] for any malformed value and
    /// [`AuditError::InvalidCallable`] for an unknown username provider.
    pub fn from_options(options: AuditOptions) -> Result<Self> {
        let audited = options
            .audited_entities
            .into_iter()
            .map(EntityName::new)
            .collect::<Result<Vec<_>>>()?;

        let mut ignored = BTreeMap::new();
        for (entity, properties) in options.entity_ignored_properties {
            ignored.insert(EntityName::new(entity)?, properties);
        }

        let mut config = Self::for_entities(audited);
        config.set_table_affixes(options.table_prefix, options.table_suffix)?;
        config.set_revision_table_name(options.revision_table_name)?;
        config.set_revision_columns(options.revision_field_name, options.revision_type_field_name)?;
        config.set_revision_id_field_type(options.revision_id_field_type)?;
        config.set_disabled_foreign_keys(options.disable_foreign_keys);
        config.set_convert_enum_to_string(options.convert_enum_to_string);
        config.set_database_platform(options.platform);
        config.set_global_ignore_columns(options.global_ignore_columns)?;
        config.set_entity_ignored_properties(ignored)?;
        if let Some(provider) = options.username_provider {
            config.actor = parse_username_provider(&provider)?;
        }
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if any value
    /// is invalid.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_options(AuditOptions::from_file(path)?)
    }

    /// Snapshot this configuration as an options bundle.
    ///
    /// Closure-backed username providers cannot be serialized and are written
    /// as `None`.
    pub fn to_options(&self) -> AuditOptions {
        AuditOptions {
            audited_entities: self
                .audited_entities
                .iter()
                .map(|e| e.as_str().to_owned())
                .collect(),
            table_prefix: self.table_prefix.clone(),
            table_suffix: self.table_suffix.clone(),
            revision_table_name: self.revision_table_name.clone(),
            revision_field_name: self.revision_field_name.clone(),
            revision_type_field_name: self.revision_type_field_name.clone(),
            revision_id_field_type: self.revision_id_field_type.clone(),
            disable_foreign_keys: self.disable_foreign_keys,
            convert_enum_to_string: self.convert_enum_to_string,
            platform: self.database_platform,
            global_ignore_columns: self.global_ignore_columns.iter().cloned().collect(),
            entity_ignored_properties: self
                .entity_ignored_properties
                .iter()
                .map(|(k, v)| (k.as_str().to_owned(), v.iter().cloned().collect()))
                .collect(),
            username_provider: None,
        }
    }

    // -- audited entities -------------------------------------------------

    /// Replace the audited entity list.
    pub fn set_audited_entities<I>(&mut self, entities: I)
    where
        I: IntoIterator<Item = EntityName>,
    {
        self.audited_entities = entities.into_iter().collect();
    }

    /// Audited entities, in configuration order.
    pub fn audited_entities(&self) -> &[EntityName] {
        &self.audited_entities
    }

    /// Build the registry answering "is this entity audited?".
    pub fn create_registry(&self) -> AuditRegistry {
        AuditRegistry::new(self.audited_entities.iter().cloned())
    }

    // -- naming -----------------------------------------------------------

    /// Audit table name for an entity: prefix + `[schema.]table` + suffix.
    pub fn audit_table_name(&self, metadata: &ClassMetadata) -> String {
        self.audit_table_name_for(&metadata.qualified_table_name())
    }

    /// Audit table name for a source table called `table_name`.
    pub fn audit_table_name_for(&self, table_name: &str) -> String {
        format!("{}{}{}", self.table_prefix, table_name, self.table_suffix)
    }

    /// Prefix prepended to audit table names.
    pub fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    /// Set the audit table prefix.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidOption`] if the prefix contains whitespace,
    /// or if both prefix and suffix would be empty.
    pub fn set_table_prefix(&mut self, prefix: impl Into<String>) -> Result<()> {
        let suffix = self.table_suffix.clone();
        self.set_table_affixes(prefix.into(), suffix)
    }

    /// Suffix appended to audit table names.
    pub fn table_suffix(&self) -> &str {
        &self.table_suffix
    }

    /// Set the audit table suffix.
    ///
    /// # Errors
    ///
    /// Same as [`AuditConfiguration::set_table_prefix`].
    pub fn set_table_suffix(&mut self, suffix: impl Into<String>) -> Result<()> {
        let prefix = self.table_prefix.clone();
        self.set_table_affixes(prefix, suffix.into())
    }

    fn set_table_affixes(&mut self, prefix: String, suffix: String) -> Result<()> {
        validate_affix("table_prefix", &prefix)?;
        validate_affix("table_suffix", &suffix)?;
        if prefix.is_empty() && suffix.is_empty() {
            return Err(AuditError::InvalidOption(
                "table_prefix and table_suffix cannot both be empty".into(),
            ));
        }
        self.table_prefix = prefix;
        self.table_suffix = suffix;
        Ok(())
    }

    /// Name of the revisions ledger table.
    pub fn revision_table_name(&self) -> &str {
        &self.revision_table_name
    }

    /// Set the revisions ledger table name.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidOption`] if the name is empty or contains
    /// whitespace.
    pub fn set_revision_table_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        validate_identifier("revision_table_name", &name)?;
        self.revision_table_name = name;
        Ok(())
    }

    /// Revision id column name.
    pub fn revision_field_name(&self) -> &str {
        &self.revision_field_name
    }

    /// Set the revision id column name.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidOption`] if the name is not a valid
    /// identifier or clashes with the revision-type column.
    pub fn set_revision_field_name(&mut self, name: impl Into<String>) -> Result<()> {
        let type_name = self.revision_type_field_name.clone();
        self.set_revision_columns(name.into(), type_name)
    }

    /// Revision-type column name.
    pub fn revision_type_field_name(&self) -> &str {
        &self.revision_type_field_name
    }

    /// Set the revision-type column name.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidOption`] if the name is not a valid
    /// identifier or clashes with the revision id column.
    pub fn set_revision_type_field_name(&mut self, name: impl Into<String>) -> Result<()> {
        let field_name = self.revision_field_name.clone();
        self.set_revision_columns(field_name, name.into())
    }

    fn set_revision_columns(&mut self, field_name: String, type_field_name: String) -> Result<()> {
        validate_identifier("revision_field_name", &field_name)?;
        validate_identifier("revision_type_field_name", &type_field_name)?;
        if field_name.eq_ignore_ascii_case(&type_field_name) {
            return Err(AuditError::InvalidOption(format!(
                "revision_field_name and revision_type_field_name clash on {field_name:?}"
            )));
        }
        self.revision_field_name = field_name;
        self.revision_type_field_name = type_field_name;
        Ok(())
    }

    /// Type of the revision id column.
    pub fn revision_id_field_type(&self) -> &ColumnType {
        &self.revision_id_field_type
    }

    /// Set the revision id type.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidOption`] unless the type is an integer,
    /// string or guid type, the only kinds usable as a ledger key.
    pub fn set_revision_id_field_type(&mut self, column_type: ColumnType) -> Result<()> {
        if !(column_type.is_integer() || matches!(column_type, ColumnType::String | ColumnType::Guid)) {
            return Err(AuditError::InvalidOption(format!(
                "revision_id_field_type cannot be {column_type}"
            )));
        }
        self.revision_id_field_type = column_type;
        Ok(())
    }

    // -- foreign keys -----------------------------------------------------

    /// Returns `true` when audit tables get no foreign key to the ledger.
    pub fn are_foreign_keys_disabled(&self) -> bool {
        self.disable_foreign_keys
    }

    /// Enable or disable ledger foreign keys.
    pub fn set_disabled_foreign_keys(&mut self, disabled: bool) {
        self.disable_foreign_keys = disabled;
    }

    // -- enum conversion --------------------------------------------------

    /// Whether native `ENUM` columns are stored as strings in audit tables.
    pub fn convert_enum_to_string(&self) -> bool {
        self.convert_enum_to_string
    }

    /// Enable or disable enum-to-string conversion. Requires a platform,
    /// checked when the platform is read.
    pub fn set_convert_enum_to_string(&mut self, convert: bool) {
        self.convert_enum_to_string = convert;
    }

    /// The configured SQL dialect.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::ConfigurationMissing`] when enum-to-string
    /// conversion is enabled but no platform is set.
    pub fn database_platform(&self) -> Result<Option<Platform>> {
        if self.convert_enum_to_string && self.database_platform.is_none() {
            return Err(AuditError::ConfigurationMissing(
                DATABASE_PLATFORM_KEY.to_owned(),
            ));
        }
        Ok(self.database_platform)
    }

    /// Set or clear the SQL dialect.
    pub fn set_database_platform(&mut self, platform: Option<Platform>) {
        self.database_platform = platform;
    }

    // -- ignored columns and properties -----------------------------------

    /// Columns ignored when deciding whether a change is worth a revision.
    pub fn global_ignore_columns(&self) -> &BTreeSet<String> {
        &self.global_ignore_columns
    }

    /// Replace the globally ignored columns.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidOption`] for a blank column name.
    pub fn set_global_ignore_columns<I, S>(&mut self, columns: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for column in columns {
            let column = column.into();
            validate_identifier("global_ignore_columns", &column)?;
            set.insert(column);
        }
        self.global_ignore_columns = set;
        Ok(())
    }

    /// Returns `true` if `column` is globally ignored.
    pub fn is_globally_ignored_column(&self, column: &str) -> bool {
        self.global_ignore_columns.contains(column)
    }

    /// Replace the per-entity ignored properties.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidOption`] for a blank property name.
    pub fn set_entity_ignored_properties<I, P, S>(&mut self, properties: I) -> Result<()>
    where
        I: IntoIterator<Item = (EntityName, P)>,
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut map: BTreeMap<EntityName, BTreeSet<String>> = BTreeMap::new();
        for (entity, props) in properties {
            let entry = map.entry(entity).or_default();
            for prop in props {
                let prop = prop.into();
                validate_identifier("entity_ignored_properties", &prop)?;
                entry.insert(prop);
            }
        }
        self.entity_ignored_properties = map;
        Ok(())
    }

    /// Properties ignored for `entity`; empty when none are configured.
    pub fn entity_ignored_properties(&self, entity: &EntityName) -> impl Iterator<Item = &str> {
        self.entity_ignored_properties
            .get(entity)
            .into_iter()
            .flat_map(|props| props.iter().map(String::as_str))
    }

    /// Returns `true` if `property` is left out of `entity`'s audit table.
    pub fn is_entity_ignored_property(&self, entity: &EntityName, property: &str) -> bool {
        self.entity_ignored_properties
            .get(entity)
            .is_some_and(|props| props.contains(property))
    }

    // -- actor ------------------------------------------------------------

    /// Install the username provider.
    pub fn set_actor_provider(&mut self, provider: Arc<dyn CurrentActorProvider>) {
        self.actor = provider;
    }

    /// Record `username` (or anonymous) for every revision.
    pub fn set_current_username(&mut self, username: Option<String>) {
        self.actor = Arc::new(FixedActor::new(username));
    }

    /// Username for the revision being written.
    pub fn current_username(&self) -> String {
        self.actor.current_username()
    }
}

fn validate_identifier(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AuditError::InvalidOption(format!("{key} cannot be empty")));
    }
    validate_affix(key, value)
}

fn validate_affix(key: &str, value: &str) -> Result<()> {
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(AuditError::InvalidOption(format!(
            "{key} {value:?} contains whitespace"
        )));
    }
    Ok(())
}

fn parse_username_provider(raw: &str) -> Result<Arc<dyn CurrentActorProvider>> {
    let raw = raw.trim();
    if raw == "anonymous" {
        return Ok(Arc::new(AnonymousActor));
    }
    match raw.split_once(':') {
        Some(("fixed", username)) => Ok(Arc::new(FixedActor::new(Some(username.to_owned())))),
        Some(("env", variable)) if !variable.is_empty() => Ok(Arc::new(EnvActor::new(variable))),
        _ => Err(AuditError::InvalidCallable(format!(
            "username provider must be anonymous, fixed:<name> or env:<VARIABLE>, got {raw:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    fn entity(name: &str) -> EntityName {
        EntityName::new(name).unwrap()
    }

    #[test]
    fn defaults_match_documented_conventions() {
        let config = AuditConfiguration::default();
        assert_eq!(config.table_prefix(), "");
        assert_eq!(config.table_suffix(), "_audit");
        assert_eq!(config.revision_field_name(), "rev");
        assert_eq!(config.revision_type_field_name(), "revtype");
        assert_eq!(config.revision_table_name(), "revisions");
        assert_eq!(config.revision_id_field_type(), &ColumnType::Integer);
        assert!(!config.are_foreign_keys_disabled());
        assert!(!config.convert_enum_to_string());
        assert_eq!(config.database_platform().unwrap(), None);
        assert_eq!(config.current_username(), "");
    }

    #[test]
    fn audit_table_name_uses_affixes_and_schema() {
        let mut config = AuditConfiguration::default();
        config.set_table_prefix("z_").unwrap();
        let cm = ClassMetadata::new(entity("User"), "users").with_schema("app");
        assert_eq!(config.audit_table_name(&cm), "z_app.users_audit");
        assert_eq!(config.audit_table_name_for("groups"), "z_groups_audit");
    }

    #[test]
    fn empty_prefix_and_suffix_rejected() {
        let mut config = AuditConfiguration::default();
        let err = config.set_table_suffix("").unwrap_err();
        assert!(matches!(err, AuditError::InvalidOption(_)));
        assert_eq!(config.table_suffix(), "_audit", "rejected value not applied");

        config.set_table_prefix("audit_").unwrap();
        config.set_table_suffix("").unwrap();
        assert_eq!(config.audit_table_name_for("users"), "audit_users");
    }

    #[test]
    fn whitespace_in_names_rejected() {
        let mut config = AuditConfiguration::default();
        assert!(config.set_revision_table_name("my revisions").is_err());
        assert!(config.set_revision_field_name("").is_err());
        assert!(config.set_table_prefix("a b").is_err());
    }

    #[test]
    fn revision_columns_cannot_clash() {
        let mut config = AuditConfiguration::default();
        let err = config.set_revision_field_name("REVTYPE").unwrap_err();
        assert!(err.to_string().contains("clash"));
        let err = config.set_revision_type_field_name("rev").unwrap_err();
        assert!(err.to_string().contains("clash"));
    }

    #[test]
    fn revision_id_type_must_be_key_like() {
        let mut config = AuditConfiguration::default();
        assert!(config.set_revision_id_field_type(ColumnType::Bigint).is_ok());
        assert!(config.set_revision_id_field_type(ColumnType::Guid).is_ok());
        let err = config.set_revision_id_field_type(ColumnType::Json).unwrap_err();
        assert!(err.to_string().contains("json"));
        assert_eq!(config.revision_id_field_type(), &ColumnType::Guid);
    }

    #[test]
    fn enum_conversion_requires_platform() {
        let mut config = AuditConfiguration::default();
        config.set_convert_enum_to_string(true);
        match config.database_platform() {
            Err(AuditError::ConfigurationMissing(key)) => assert_eq!(key, "databasePlatform"),
            other => panic!("expected ConfigurationMissing, got {other:?}"),
        }
        config.set_database_platform(Some(Platform::Mysql));
        assert_eq!(config.database_platform().unwrap(), Some(Platform::Mysql));
    }

    #[test]
    fn ignored_properties_are_per_entity() {
        let mut config = AuditConfiguration::default();
        config
            .set_entity_ignored_properties([(entity("Cat"), vec!["lives"])])
            .unwrap();
        assert!(config.is_entity_ignored_property(&entity("Cat"), "lives"));
        assert!(!config.is_entity_ignored_property(&entity("Dog"), "lives"));
        assert!(!config.is_entity_ignored_property(&entity("Cat"), "name"));
        assert_eq!(
            config.entity_ignored_properties(&entity("Cat")).collect::<Vec<_>>(),
            vec!["lives"]
        );
        assert_eq!(config.entity_ignored_properties(&entity("Dog")).count(), 0);
    }

    #[test]
    fn blank_ignored_property_rejected() {
        let mut config = AuditConfiguration::default();
        let err = config
            .set_entity_ignored_properties([(entity("Cat"), vec![" "])])
            .unwrap_err();
        assert!(matches!(err, AuditError::InvalidOption(_)));
    }

    #[test]
    fn global_ignore_columns() {
        let mut config = AuditConfiguration::default();
        config
            .set_global_ignore_columns(["updated_at", "created_at"])
            .unwrap();
        assert!(config.is_globally_ignored_column("updated_at"));
        assert!(!config.is_globally_ignored_column("name"));
        assert!(config.set_global_ignore_columns([""]).is_err());
    }

    #[test]
    fn registry_reflects_audited_entities() {
        let config = AuditConfiguration::for_entities([entity("User"), entity("Post")]);
        let registry = config.create_registry();
        assert!(registry.is_audited(&entity("Post")));
        assert!(!registry.is_audited(&entity("Comment")));
        assert_eq!(config.audited_entities().len(), 2);
    }

    #[test]
    fn current_username_from_fixed_and_custom_providers() {
        let mut config = AuditConfiguration::default();
        config.set_current_username(Some("alice".into()));
        assert_eq!(config.current_username(), "alice");

        config.set_actor_provider(Arc::new(crate::actor::ActorFn(|| "bob".to_owned())));
        assert_eq!(config.current_username(), "bob");
    }

    #[test]
    fn from_options_validates_every_field() {
        let options = AuditOptions {
            audited_entities: vec!["User".into()],
            revision_table_name: "".into(),
            ..AuditOptions::default()
        };
        assert!(matches!(
            AuditConfiguration::from_options(options),
            Err(AuditError::InvalidOption(_))
        ));

        let options = AuditOptions {
            audited_entities: vec!["Bad Name".into()],
            ..AuditOptions::default()
        };
        assert!(AuditConfiguration::from_options(options).is_err());
    }

    #[test]
    fn unknown_username_provider_is_invalid_callable() {
        let options = AuditOptions {
            username_provider: Some("ldap:cn=admin".into()),
            ..AuditOptions::default()
        };
        assert!(matches!(
            AuditConfiguration::from_options(options),
            Err(AuditError::InvalidCallable(_))
        ));

        let options = AuditOptions {
            username_provider: Some("fixed:deploy-bot".into()),
            ..AuditOptions::default()
        };
        let config = AuditConfiguration::from_options(options).unwrap();
        assert_eq!(config.current_username(), "deploy-bot");
    }

    #[test]
    fn toml_with_missing_fields_uses_defaults() {
        let options = AuditOptions::from_toml_str(
            r#"
            audited_entities = ["App\\Entity\\User"]
            table_prefix = "hist_"
            platform = "mysql"
            convert_enum_to_string = true

            [entity_ignored_properties]
            "App\\Entity\\User" = ["password"]
            "#,
        )
        .unwrap();
        assert_eq!(options.table_suffix, "_audit");

        let config = AuditConfiguration::from_options(options).unwrap();
        assert_eq!(config.table_prefix(), "hist_");
        assert_eq!(config.database_platform().unwrap(), Some(Platform::Mysql));
        assert!(config.is_entity_ignored_property(&entity("App\\Entity\\User"), "password"));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = AuditOptions::from_toml_str("table_prefix = [").unwrap_err();
        assert!(matches!(err, AuditError::Parse(_)));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("audit.toml");

        let mut config = AuditConfiguration::for_entities([entity("User")]);
        config.set_revision_id_field_type(ColumnType::Bigint).unwrap();
        config.set_disabled_foreign_keys(true);
        config.set_database_platform(Some(Platform::Postgresql));
        config.to_options().save_to_file(&path).unwrap();

        let loaded = AuditConfiguration::from_file(&path).unwrap();
        assert_eq!(loaded.audited_entities(), config.audited_entities());
        assert_eq!(loaded.revision_id_field_type(), &ColumnType::Bigint);
        assert!(loaded.are_foreign_keys_disabled());
        assert_eq!(loaded.database_platform().unwrap(), Some(Platform::Postgresql));
    }

    #[test]
    fn from_file_nonexistent_returns_io_error() {
        let result = AuditConfiguration::from_file(Path::new("/nonexistent/path/audit.toml"));
        assert!(matches!(result, Err(AuditError::Io(_))));
    }
}
