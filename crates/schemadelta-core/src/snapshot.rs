//! Schema snapshot types.
//!
//! A [`Snapshot`] is the parsed form of one exported schema file. The
//! exporter writes camelCase JSON, either bare (`{"version": .., "entities":
//! [..]}`) or wrapped in a `database` object next to a `formatVersion` key.
//! Keys the diff engine does not use (identity hash, views, setup queries)
//! are accepted and ignored.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// Placeholder the exporter leaves in `createSql` for the owning table.
pub const TABLE_NAME_PLACEHOLDER: &str = "${TABLE_NAME}";

/// Declared storage class of a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Affinity {
    /// TEXT.
    Text,
    /// INTEGER.
    Integer,
    /// REAL.
    Real,
    /// BLOB.
    Blob,
    /// NUMERIC.
    Numeric,
    /// Anything else, spelled as in the snapshot.
    Other(String),
}

impl Affinity {
    /// Returns `true` if default literals of this affinity are emitted
    /// without quotes.
    #[must_use]
    pub const fn takes_bare_literal(&self) -> bool {
        matches!(self, Self::Integer | Self::Real)
    }
}

impl From<String> for Affinity {
    fn from(raw: String) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "TEXT" => Self::Text,
            "INTEGER" => Self::Integer,
            "REAL" => Self::Real,
            "BLOB" => Self::Blob,
            "NUMERIC" => Self::Numeric,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for Affinity {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<Affinity> for String {
    fn from(affinity: Affinity) -> Self {
        affinity.to_string()
    }
}

impl fmt::Display for Affinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("TEXT"),
            Self::Integer => f.write_str("INTEGER"),
            Self::Real => f.write_str("REAL"),
            Self::Blob => f.write_str("BLOB"),
            Self::Numeric => f.write_str("NUMERIC"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

/// A single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Source-level identifier of the column, informational only.
    #[serde(rename = "fieldPath", default)]
    pub path: String,
    /// Column name, the key fields are compared by.
    pub column_name: String,
    /// Declared storage class.
    pub affinity: Affinity,
    /// Whether the column is declared NOT NULL.
    pub not_null: bool,
    /// Default value literal, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl Field {
    /// Creates a nullable column without default.
    #[must_use]
    pub fn new(column_name: impl Into<String>, affinity: impl Into<Affinity>) -> Self {
        let column_name = column_name.into();
        Self {
            path: column_name.clone(),
            column_name,
            affinity: affinity.into(),
            not_null: false,
            default_value: None,
        }
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Sets the default value literal.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Returns `true` if the column accepts NULL.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        !self.not_null
    }
}

/// Primary key of a table. Carried through, never diffed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryKey {
    /// Key columns in order.
    #[serde(default)]
    pub column_names: Vec<String>,
    /// Whether the key is auto-generated.
    #[serde(default)]
    pub auto_generate: bool,
}

/// Foreign key of a table. Carried through, never diffed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
    /// Referenced table.
    #[serde(default)]
    pub table: String,
    /// ON DELETE action.
    #[serde(default)]
    pub on_delete: String,
    /// ON UPDATE action.
    #[serde(default)]
    pub on_update: String,
    /// Columns of the owning table.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Columns of the referenced table.
    #[serde(default)]
    pub referenced_columns: Vec<String>,
}

/// An index on a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    /// Index name, the key indices are compared by.
    pub name: String,
    /// Whether this is a UNIQUE index.
    #[serde(default)]
    pub unique: bool,
    /// Indexed columns in order.
    #[serde(alias = "columnNames")]
    pub columns: Vec<String>,
    /// Sort orders, parallel to `columns`.
    #[serde(default)]
    pub orders: Vec<String>,
    /// Statement creating the index.
    pub create_sql: String,
}

impl Index {
    /// Creates an index description.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        columns: Vec<String>,
        create_sql: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            unique: false,
            columns,
            orders: Vec::new(),
            create_sql: create_sql.into(),
        }
    }

    /// Marks the index UNIQUE.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Returns the create statement with the table placeholder expanded.
    #[must_use]
    pub fn create_statement(&self, table: &str) -> String {
        self.create_sql.replace(TABLE_NAME_PLACEHOLDER, table)
    }
}

/// A single table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Table name.
    #[serde(rename = "tableName")]
    pub name: String,
    /// Statement creating the table.
    pub create_sql: String,
    /// Columns in declaration order.
    pub fields: Vec<Field>,
    /// Primary key.
    #[serde(default)]
    pub primary_key: PrimaryKey,
    /// Indices; absent in the file means none.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub indices: Vec<Index>,
    /// Foreign keys; absent in the file means none.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    /// Creates a table with no columns.
    #[must_use]
    pub fn new(name: impl Into<String>, create_sql: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            create_sql: create_sql.into(),
            fields: Vec::new(),
            primary_key: PrimaryKey::default(),
            indices: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Adds a column.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds an index.
    #[must_use]
    pub fn index(mut self, index: Index) -> Self {
        self.indices.push(index);
        self
    }

    /// Sets the primary key columns.
    #[must_use]
    pub fn primary_key(mut self, columns: &[&str], auto_generate: bool) -> Self {
        self.primary_key = PrimaryKey {
            column_names: columns.iter().map(ToString::to_string).collect(),
            auto_generate,
        };
        self
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.column_name == name)
    }

    /// Returns the create statement with the table placeholder expanded.
    #[must_use]
    pub fn create_statement(&self) -> String {
        self.create_sql.replace(TABLE_NAME_PLACEHOLDER, &self.name)
    }
}

/// An immutable schema snapshot for one version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Schema version.
    pub version: i64,
    /// Tables in file order.
    #[serde(rename = "entities")]
    pub tables: Vec<Table>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new(version: i64) -> Self {
        Self {
            version,
            tables: Vec::new(),
        }
    }

    /// Adds a table.
    #[must_use]
    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Looks up a table by name.
    #[must_use]
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Parses the JSON text of the snapshot expected to describe `version`.
    ///
    /// Accepts both the bare and the `database`-wrapped layout. The parsed
    /// snapshot is validated before it is returned.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Parse`] for invalid JSON or a missing required
    /// field, and [`SchemaError::Structural`] if the declared version differs
    /// from `version` or a uniqueness invariant is violated.
    pub fn parse(version: i64, text: &str) -> Result<Self> {
        let parse_err = |source| SchemaError::Parse { version, source };

        let mut document: serde_json::Value = serde_json::from_str(text).map_err(parse_err)?;
        if let Some(database) = document.get_mut("database") {
            document = database.take();
        }
        let snapshot: Self = serde_json::from_value(document).map_err(parse_err)?;

        if snapshot.version != version {
            return Err(SchemaError::structural(
                version,
                format!("file declares version {}", snapshot.version),
            ));
        }
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Checks that table, column and index names are unique.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Structural`] naming the first duplicate found.
    pub fn validate(&self) -> Result<()> {
        let mut tables = HashSet::new();
        for table in &self.tables {
            if !tables.insert(table.name.as_str()) {
                return Err(SchemaError::structural(
                    self.version,
                    format!("duplicate table '{}'", table.name),
                ));
            }

            let mut columns = HashSet::new();
            for field in &table.fields {
                if !columns.insert(field.column_name.as_str()) {
                    return Err(SchemaError::structural(
                        self.version,
                        format!(
                            "duplicate column '{}' in table '{}'",
                            field.column_name, table.name
                        ),
                    ));
                }
            }

            let mut indices = HashSet::new();
            for index in &table.indices {
                if !indices.insert(index.name.as_str()) {
                    return Err(SchemaError::structural(
                        self.version,
                        format!("duplicate index '{}' in table '{}'", index.name, table.name),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WRAPPED: &str = r#"{
        "formatVersion": 1,
        "database": {
            "version": 2,
            "identityHash": "a1b2c3",
            "entities": [
                {
                    "tableName": "users",
                    "createSql": "CREATE TABLE IF NOT EXISTS `${TABLE_NAME}` (`id` INTEGER NOT NULL, `name` TEXT, PRIMARY KEY(`id`))",
                    "fields": [
                        {"fieldPath": "id", "columnName": "id", "affinity": "INTEGER", "notNull": true},
                        {"fieldPath": "name", "columnName": "name", "affinity": "TEXT", "notNull": false}
                    ],
                    "primaryKey": {"columnNames": ["id"], "autoGenerate": true},
                    "indices": [
                        {
                            "name": "index_users_name",
                            "unique": false,
                            "columnNames": ["name"],
                            "orders": [],
                            "createSql": "CREATE INDEX IF NOT EXISTS `index_users_name` ON `${TABLE_NAME}` (`name`)"
                        }
                    ],
                    "foreignKeys": []
                }
            ],
            "views": [],
            "setupQueries": []
        }
    }"#;

    #[test]
    fn parse_wrapped_document() {
        let snapshot = Snapshot::parse(2, WRAPPED).unwrap();
        assert_eq!(snapshot.version, 2);
        assert_eq!(snapshot.tables.len(), 1);

        let users = snapshot.get_table("users").unwrap();
        assert_eq!(users.fields.len(), 2);
        assert!(users.primary_key.auto_generate);
        assert_eq!(users.indices[0].columns, vec!["name".to_string()]);

        let id = users.column("id").unwrap();
        assert_eq!(id.affinity, Affinity::Integer);
        assert!(id.not_null);
        assert!(users.column("name").unwrap().is_nullable());
    }

    #[test]
    fn parse_bare_document_without_indices() {
        let text = r#"{
            "version": 1,
            "entities": [
                {
                    "tableName": "notes",
                    "createSql": "CREATE TABLE notes (body TEXT)",
                    "fields": [
                        {"columnName": "body", "affinity": "text", "notNull": false, "defaultValue": "''"}
                    ],
                    "primaryKey": {"columnNames": [], "autoGenerate": false}
                }
            ]
        }"#;
        let snapshot = Snapshot::parse(1, text).unwrap();
        let notes = snapshot.get_table("notes").unwrap();
        assert!(notes.indices.is_empty());
        assert!(notes.foreign_keys.is_empty());
        assert_eq!(notes.fields[0].affinity, Affinity::Text);
        assert_eq!(notes.fields[0].default_value.as_deref(), Some("''"));
    }

    #[test]
    fn null_indices_are_empty() {
        let text = r#"{"version": 1, "entities": [
            {"tableName": "t", "createSql": "CREATE TABLE t (a TEXT)", "fields": [], "indices": null}
        ]}"#;
        let snapshot = Snapshot::parse(1, text).unwrap();
        assert!(snapshot.tables[0].indices.is_empty());
    }

    #[test]
    fn table_without_fields_is_rejected() {
        let text = r#"{"version": 3, "entities": [{"tableName": "t", "createSql": "CREATE TABLE t (a TEXT)"}]}"#;
        let err = Snapshot::parse(3, text).unwrap_err();
        assert!(matches!(err, SchemaError::Parse { version: 3, .. }));
        assert!(err.to_string().contains("fields"), "{err}");
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = Snapshot::parse(4, "{ not json").unwrap_err();
        assert!(matches!(err, SchemaError::Parse { version: 4, .. }));
    }

    #[test]
    fn version_mismatch_is_structural() {
        let err = Snapshot::parse(5, WRAPPED).unwrap_err();
        assert!(matches!(err, SchemaError::Structural { version: 5, .. }));
    }

    #[test]
    fn duplicate_column_is_structural() {
        let snapshot = Snapshot::new(1).table(
            Table::new("t", "CREATE TABLE t (a TEXT)")
                .field(Field::new("a", "TEXT"))
                .field(Field::new("a", "INTEGER")),
        );
        let err = snapshot.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate column 'a'"), "{err}");
    }

    #[test]
    fn duplicate_table_is_structural() {
        let snapshot = Snapshot::new(1)
            .table(Table::new("t", "CREATE TABLE t ()"))
            .table(Table::new("t", "CREATE TABLE t ()"));
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn affinity_parsing_keeps_unknown_spelling() {
        assert_eq!(Affinity::from("integer"), Affinity::Integer);
        assert_eq!(Affinity::from("Real"), Affinity::Real);
        assert_eq!(
            Affinity::from("UNDEFINED"),
            Affinity::Other("UNDEFINED".into())
        );
        assert_eq!(Affinity::from("UNDEFINED").to_string(), "UNDEFINED");
        assert!(Affinity::Integer.takes_bare_literal());
        assert!(!Affinity::Blob.takes_bare_literal());
    }

    #[test]
    fn create_statement_expands_placeholder() {
        let snapshot = Snapshot::parse(2, WRAPPED).unwrap();
        let users = &snapshot.tables[0];
        assert!(users.create_statement().starts_with("CREATE TABLE IF NOT EXISTS `users`"));
        assert_eq!(
            users.indices[0].create_statement(&users.name),
            "CREATE INDEX IF NOT EXISTS `index_users_name` ON `users` (`name`)"
        );
    }
}
