//! Schema snapshot diff engine and migration classifier.
//!
//! `schemadelta-core` compares exported schema snapshots of consecutive
//! database versions and decides, per transition, how it can be migrated:
//! - changes the database can apply directly become SQL statements;
//! - changes migration tooling can apply mechanically (delete a table,
//!   delete or rename a column) become declarative directives;
//! - anything else (new tables, type changes, NOT NULL columns without a
//!   default) marks the transition as needing hand-written migration logic.
//!
//! # Architecture
//!
//! - **Snapshot** - parsed schema of one version
//! - **Diff** - entity, column and index comparison producing [`Change`]s
//! - **Render** - SQL dialect and directive syntax, behind traits
//! - **Migration** - folds the changes of one transition into a verdict
//! - **Planner** - walks adjacent version pairs, isolating failures
//!
//! # Example
//!
//! ```rust
//! use schemadelta_core::prelude::*;
//!
//! let v1 = Snapshot::new(1).table(
//!     Table::new("users", "CREATE TABLE users (id INTEGER NOT NULL, name TEXT)")
//!         .field(Field::new("id", "INTEGER").not_null())
//!         .field(Field::new("name", "TEXT")),
//! );
//! let v2 = Snapshot::new(2).table(
//!     Table::new("users", "CREATE TABLE users (id INTEGER NOT NULL, full_name TEXT)")
//!         .field(Field::new("id", "INTEGER").not_null())
//!         .field(Field::new("full_name", "TEXT")),
//! );
//!
//! let tables = diff_snapshots(&v1, &v2).unwrap();
//! let migration = Migration::assemble(1, 2, tables, &SqliteDialect::new(), &RoomAnnotations::new());
//!
//! assert_eq!(migration.verdict(), Verdict::AutoMigration);
//! assert_eq!(
//!     migration.auto_directives[1],
//!     r#"@RenameColumn(tableName = "users", fromColumnName = "name", toColumnName = "full_name")"#
//! );
//! ```

pub mod change;
pub mod diff;
pub mod error;
pub mod migration;
pub mod planner;
pub mod render;
pub mod snapshot;

pub use error::{PlanError, Result, SchemaError};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::change::{AutoDirective, Change, ChangeKind, SqlStatement, TableComparison};
    pub use crate::diff::{diff_fields, diff_indices, diff_snapshots, diff_table, diff_tables};
    pub use crate::error::{PlanError, SchemaError};
    pub use crate::migration::{Migration, Verdict};
    pub use crate::planner::{LoadedSnapshot, PairOutcome, plan_pair, plan_sequence};
    pub use crate::render::{DirectiveSyntax, RoomAnnotations, SqlDialect, SqliteDialect};
    pub use crate::snapshot::{Affinity, Field, ForeignKey, Index, PrimaryKey, Snapshot, Table};
}
