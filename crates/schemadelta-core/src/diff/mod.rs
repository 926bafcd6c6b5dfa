//! Schema diff engine.
//!
//! Compares an older and a newer [`Snapshot`] table by table and produces
//! one [`TableComparison`] per table that changed. Column and index
//! comparisons live in [`fields`] and [`indices`].

pub mod fields;
pub mod indices;

use std::collections::HashSet;

use tracing::debug;

use crate::change::{Change, TableComparison};
use crate::error::Result;
use crate::snapshot::{Snapshot, Table};

pub use fields::diff_fields;
pub use indices::diff_indices;

/// Compares two snapshots.
///
/// Both snapshots are validated first, so the result is either the complete
/// list of comparisons or an error; never a partial list.
///
/// # Errors
///
/// Returns [`SchemaError::Structural`](crate::SchemaError::Structural) if
/// either snapshot violates a uniqueness invariant.
pub fn diff_snapshots(old: &Snapshot, new: &Snapshot) -> Result<Vec<TableComparison>> {
    old.validate()?;
    new.validate()?;
    Ok(diff_tables(&old.tables, &new.tables))
}

/// Compares two table sets by name.
///
/// Order: [added tables, new order] [removed tables, old order] [changed
/// tables, old order].
#[must_use]
pub fn diff_tables(old: &[Table], new: &[Table]) -> Vec<TableComparison> {
    let old_names: HashSet<&str> = old.iter().map(|t| t.name.as_str()).collect();
    let new_names: HashSet<&str> = new.iter().map(|t| t.name.as_str()).collect();

    let mut comparisons = Vec::new();

    // Tables to create
    for table in new.iter().filter(|t| !old_names.contains(t.name.as_str())) {
        comparisons.push(TableComparison::new(
            &table.name,
            vec![Change::table_added(table)],
        ));
    }

    // Tables to drop
    for table in old.iter().filter(|t| !new_names.contains(t.name.as_str())) {
        comparisons.push(TableComparison::new(
            &table.name,
            vec![Change::table_removed(&table.name)],
        ));
    }

    // Tables in both
    for old_table in old {
        let Some(new_table) = new.iter().find(|t| t.name == old_table.name) else {
            continue;
        };
        let changes = diff_table(&old_table.name, old_table, new_table);
        debug!(
            table = old_table.name.as_str(),
            changes = changes.len(),
            "compared table"
        );
        if !changes.is_empty() {
            comparisons.push(TableComparison::new(&old_table.name, changes));
        }
    }

    comparisons
}

/// Compares one table present in both snapshots: column changes first, then
/// index changes.
#[must_use]
pub fn diff_table(table_name: &str, old: &Table, new: &Table) -> Vec<Change> {
    let mut changes = diff_fields(table_name, old, new);
    changes.extend(diff_indices(table_name, old, new));
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::ChangeKind;
    use crate::snapshot::{Field, Index};

    fn users() -> Table {
        Table::new(
            "users",
            "CREATE TABLE IF NOT EXISTS `${TABLE_NAME}` (`id` INTEGER NOT NULL, PRIMARY KEY(`id`))",
        )
        .field(Field::new("id", "INTEGER").not_null())
        .field(Field::new("name", "TEXT"))
        .primary_key(&["id"], true)
    }

    fn posts() -> Table {
        Table::new("posts", "CREATE TABLE posts (id INTEGER NOT NULL)")
            .field(Field::new("id", "INTEGER").not_null())
    }

    #[test]
    fn identical_snapshots_have_no_changes() {
        let snapshot = Snapshot::new(1).table(users()).table(posts());
        assert!(diff_snapshots(&snapshot, &snapshot).unwrap().is_empty());
    }

    #[test]
    fn added_table_is_manual_with_create_statement() {
        let old = Snapshot::new(1).table(users());
        let new = Snapshot::new(2).table(users()).table(posts());
        let comparisons = diff_snapshots(&old, &new).unwrap();
        assert_eq!(comparisons.len(), 1);
        let change = &comparisons[0].changes[0];
        assert_eq!(change.kind, ChangeKind::TableAdded);
        assert!(change.requires_manual);
        assert!(change.directive.is_none());
    }

    #[test]
    fn removed_table_is_automatic() {
        let old = Snapshot::new(1).table(users()).table(posts());
        let new = Snapshot::new(2).table(users());
        let comparisons = diff_snapshots(&old, &new).unwrap();
        assert_eq!(comparisons.len(), 1);
        assert_eq!(comparisons[0].table_name, "posts");
        let change = &comparisons[0].changes[0];
        assert_eq!(change.kind, ChangeKind::TableRemoved);
        assert!(!change.requires_manual);
        assert!(change.directive.is_some());
    }

    #[test]
    fn comparisons_are_ordered_added_removed_changed() {
        let old = Snapshot::new(1)
            .table(users())
            .table(Table::new("gone", "CREATE TABLE gone (x TEXT)").field(Field::new("x", "TEXT")));
        let new = Snapshot::new(2)
            .table(posts())
            .table(users().field(Field::new("email", "TEXT")));
        let names: Vec<_> = diff_snapshots(&old, &new)
            .unwrap()
            .into_iter()
            .map(|c| c.table_name)
            .collect();
        assert_eq!(names, vec!["posts", "gone", "users"]);
    }

    #[test]
    fn column_changes_precede_index_changes() {
        let old = users();
        let new = users()
            .field(Field::new("email", "TEXT"))
            .index(Index::new(
                "index_users_email",
                vec!["email".into()],
                "CREATE INDEX `index_users_email` ON `${TABLE_NAME}` (`email`)",
            ));
        let kinds: Vec<_> = diff_table("users", &old, &new)
            .into_iter()
            .map(|c| c.kind)
            .collect();
        assert_eq!(kinds, vec![ChangeKind::ColumnAdded, ChangeKind::IndexAdded]);
    }

    #[test]
    fn invalid_snapshot_fails_whole_diff() {
        let old = Snapshot::new(1).table(users());
        let new = Snapshot::new(2).table(users()).table(users());
        let err = diff_snapshots(&old, &new).unwrap_err();
        assert_eq!(err.version(), 2);
    }
}
