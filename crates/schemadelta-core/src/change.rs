//! Classified schema changes.
//!
//! A [`Change`] is only built through its per-kind constructors, which fix
//! which of `sql` and `directive` are populated and whether the change needs
//! a hand-written migration:
//!
//! | kind              | sql                 | directive      | manual |
//! |-------------------|---------------------|----------------|--------|
//! | TableAdded        | create statement    | -              | yes    |
//! | TableRemoved      | drop table          | delete table   | no     |
//! | ColumnAdded       | add column / -      | -              | no/yes |
//! | ColumnRemoved     | -                   | delete column  | no     |
//! | ColumnRenamed     | -                   | rename column  | no     |
//! | ColumnTypeChanged | -                   | -              | yes    |
//! | IndexAdded        | create statement    | -              | no     |
//! | IndexRemoved      | drop index          | -              | no     |
//!
//! Statements and directives are kept structured; turning them into text is
//! the job of [`render`](crate::render).

use std::fmt;

use serde::Serialize;

use crate::snapshot::{Affinity, Field, Index, Table};

/// The kind of a structural change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChangeKind {
    /// A table exists only in the newer snapshot.
    TableAdded,
    /// A table exists only in the older snapshot.
    TableRemoved,
    /// A column exists only in the newer table.
    ColumnAdded,
    /// A column exists only in the older table.
    ColumnRemoved,
    /// A removed and an added column were paired up as a rename.
    ColumnRenamed,
    /// A column kept its name but changed affinity.
    ColumnTypeChanged,
    /// An index exists only in the newer table.
    IndexAdded,
    /// An index exists only in the older table.
    IndexRemoved,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TableAdded => "table added",
            Self::TableRemoved => "table removed",
            Self::ColumnAdded => "column added",
            Self::ColumnRemoved => "column removed",
            Self::ColumnRenamed => "column renamed",
            Self::ColumnTypeChanged => "column type changed",
            Self::IndexAdded => "index added",
            Self::IndexRemoved => "index removed",
        };
        f.write_str(label)
    }
}

/// A statement the database can apply directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SqlStatement {
    /// Create statement taken from the snapshot, placeholder expanded.
    Verbatim(String),
    /// Drop a table.
    DropTable {
        /// Table name.
        table: String,
    },
    /// Drop an index.
    DropIndex {
        /// Index name.
        name: String,
    },
    /// Add a column to an existing table.
    AddColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
        /// Declared affinity.
        affinity: Affinity,
        /// Whether to emit NOT NULL.
        not_null: bool,
        /// Default literal, unformatted.
        default: Option<String>,
    },
}

/// An instruction the migration tooling can apply without hand-written SQL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AutoDirective {
    /// Delete a table.
    DeleteTable {
        /// Table name.
        table: String,
    },
    /// Delete a column.
    DeleteColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },
    /// Rename a column.
    RenameColumn {
        /// Table name.
        table: String,
        /// Old column name.
        from: String,
        /// New column name.
        to: String,
    },
}

/// A single classified change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    /// What changed.
    pub kind: ChangeKind,
    /// Table the change belongs to.
    pub table: String,
    /// Column the change is about, for column changes. For renames this is
    /// the new name.
    pub column: Option<String>,
    /// Human-readable summary.
    pub description: String,
    /// Statement applying the change, if the engine can apply it directly.
    pub sql: Option<SqlStatement>,
    /// Declarative instruction, if the tooling can apply it mechanically.
    pub directive: Option<AutoDirective>,
    /// Whether the change needs hand-written migration logic.
    pub requires_manual: bool,
}

impl Change {
    /// A table present only in the newer snapshot.
    #[must_use]
    pub fn table_added(table: &Table) -> Self {
        Self {
            kind: ChangeKind::TableAdded,
            table: table.name.clone(),
            column: None,
            description: format!("Table `{}` added", table.name),
            sql: Some(SqlStatement::Verbatim(table.create_statement())),
            directive: None,
            requires_manual: true,
        }
    }

    /// A table present only in the older snapshot.
    #[must_use]
    pub fn table_removed(table: &str) -> Self {
        Self {
            kind: ChangeKind::TableRemoved,
            table: table.to_string(),
            column: None,
            description: format!("Table `{table}` removed"),
            sql: Some(SqlStatement::DropTable {
                table: table.to_string(),
            }),
            directive: Some(AutoDirective::DeleteTable {
                table: table.to_string(),
            }),
            requires_manual: false,
        }
    }

    /// A column present only in the newer table.
    ///
    /// A NOT NULL column without default cannot be backfilled, so it gets no
    /// statement and is flagged manual.
    #[must_use]
    pub fn column_added(table: &str, field: &Field) -> Self {
        let backfillable = field.default_value.is_some() || field.is_nullable();
        let sql = backfillable.then(|| SqlStatement::AddColumn {
            table: table.to_string(),
            column: field.column_name.clone(),
            affinity: field.affinity.clone(),
            not_null: field.not_null,
            default: field.default_value.clone(),
        });
        Self {
            kind: ChangeKind::ColumnAdded,
            table: table.to_string(),
            column: Some(field.column_name.clone()),
            description: format!("Column `{table}`.`{}` added", field.column_name),
            sql,
            directive: None,
            requires_manual: !backfillable,
        }
    }

    /// A column present only in the older table.
    #[must_use]
    pub fn column_removed(table: &str, column: &str) -> Self {
        Self {
            kind: ChangeKind::ColumnRemoved,
            table: table.to_string(),
            column: Some(column.to_string()),
            description: format!("Column `{table}`.`{column}` removed"),
            sql: None,
            directive: Some(AutoDirective::DeleteColumn {
                table: table.to_string(),
                column: column.to_string(),
            }),
            requires_manual: false,
        }
    }

    /// A column renamed from `from` to `to`.
    #[must_use]
    pub fn column_renamed(table: &str, from: &str, to: &str) -> Self {
        Self {
            kind: ChangeKind::ColumnRenamed,
            table: table.to_string(),
            column: Some(to.to_string()),
            description: format!("Column `{table}`.`{from}` renamed to `{to}`"),
            sql: None,
            directive: Some(AutoDirective::RenameColumn {
                table: table.to_string(),
                from: from.to_string(),
                to: to.to_string(),
            }),
            requires_manual: false,
        }
    }

    /// A column whose affinity changed.
    #[must_use]
    pub fn column_type_changed(table: &str, old: &Field, new: &Field) -> Self {
        Self {
            kind: ChangeKind::ColumnTypeChanged,
            table: table.to_string(),
            column: Some(new.column_name.clone()),
            description: format!(
                "Column `{table}`.`{}` type changed from {} to {}",
                new.column_name, old.affinity, new.affinity
            ),
            sql: None,
            directive: None,
            requires_manual: true,
        }
    }

    /// An index present only in the newer table.
    #[must_use]
    pub fn index_added(table: &str, index: &Index) -> Self {
        Self {
            kind: ChangeKind::IndexAdded,
            table: table.to_string(),
            column: None,
            description: format!("Index `{}` added on `{table}`", index.name),
            sql: Some(SqlStatement::Verbatim(index.create_statement(table))),
            directive: None,
            requires_manual: false,
        }
    }

    /// An index present only in the older table.
    #[must_use]
    pub fn index_removed(table: &str, index: &Index) -> Self {
        Self {
            kind: ChangeKind::IndexRemoved,
            table: table.to_string(),
            column: None,
            description: format!("Index `{}` removed from `{table}`", index.name),
            sql: Some(SqlStatement::DropIndex {
                name: index.name.clone(),
            }),
            directive: None,
            requires_manual: false,
        }
    }
}

/// All changes detected for one table, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableComparison {
    /// Table name.
    pub table_name: String,
    /// Changes in discovery order.
    pub changes: Vec<Change>,
}

impl TableComparison {
    /// Creates a comparison for `table_name`.
    #[must_use]
    pub fn new(table_name: impl Into<String>, changes: Vec<Change>) -> Self {
        Self {
            table_name: table_name.into(),
            changes,
        }
    }
}
