//! Index-level diff.

use std::collections::HashSet;

use crate::change::Change;
use crate::snapshot::Table;

/// Compares the indices of one table across two snapshots, by name only.
///
/// Output order is [added, new order] then [removed, old order]. An index
/// redefined under an unchanged name produces nothing.
#[must_use]
pub fn diff_indices(table_name: &str, old: &Table, new: &Table) -> Vec<Change> {
    let old_names: HashSet<&str> = old.indices.iter().map(|i| i.name.as_str()).collect();
    let new_names: HashSet<&str> = new.indices.iter().map(|i| i.name.as_str()).collect();

    let added = new
        .indices
        .iter()
        .filter(|i| !old_names.contains(i.name.as_str()))
        .map(|i| Change::index_added(table_name, i));
    let removed = old
        .indices
        .iter()
        .filter(|i| !new_names.contains(i.name.as_str()))
        .map(|i| Change::index_removed(table_name, i));

    added.chain(removed).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::{ChangeKind, SqlStatement};
    use crate::snapshot::Index;

    fn idx(name: &str, column: &str) -> Index {
        Index::new(
            name,
            vec![column.to_string()],
            format!("CREATE INDEX IF NOT EXISTS `{name}` ON `${{TABLE_NAME}}` (`{column}`)"),
        )
    }

    fn table(indices: Vec<Index>) -> Table {
        indices
            .into_iter()
            .fold(Table::new("t", "CREATE TABLE t ()"), Table::index)
    }

    #[test]
    fn unchanged_indices_have_no_changes() {
        let t = table(vec![idx("index_t_a", "a")]);
        assert!(diff_indices("t", &t, &t).is_empty());
    }

    #[test]
    fn added_index_uses_its_create_statement() {
        let old = table(vec![]);
        let new = table(vec![idx("index_t_a", "a")]);
        let changes = diff_indices("t", &old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::IndexAdded);
        assert_eq!(
            changes[0].sql,
            Some(SqlStatement::Verbatim(
                "CREATE INDEX IF NOT EXISTS `index_t_a` ON `t` (`a`)".into()
            ))
        );
    }

    #[test]
    fn removed_index_is_dropped() {
        let old = table(vec![idx("index_t_a", "a")]);
        let new = table(vec![]);
        let changes = diff_indices("t", &old, &new);
        assert_eq!(changes[0].kind, ChangeKind::IndexRemoved);
        assert_eq!(
            changes[0].sql,
            Some(SqlStatement::DropIndex {
                name: "index_t_a".into()
            })
        );
    }

    #[test]
    fn added_come_before_removed() {
        let old = table(vec![idx("old_one", "a")]);
        let new = table(vec![idx("new_one", "a")]);
        let kinds: Vec<_> = diff_indices("t", &old, &new)
            .into_iter()
            .map(|c| c.kind)
            .collect();
        assert_eq!(kinds, vec![ChangeKind::IndexAdded, ChangeKind::IndexRemoved]);
    }

    #[test]
    fn redefinition_under_same_name_is_ignored() {
        let old = table(vec![idx("index_t_a", "a")]);
        let new = table(vec![idx("index_t_a", "b").unique()]);
        assert!(diff_indices("t", &old, &new).is_empty());
    }
}
