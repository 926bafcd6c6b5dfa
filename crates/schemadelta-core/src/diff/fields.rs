//! Column-level diff, including the rename heuristic.

use std::collections::HashMap;

use tracing::info;

use crate::change::Change;
use crate::snapshot::{Field, Table};

/// Compares the columns of one table across two snapshots.
///
/// Changes come out as [added, new order] [removed, old order]
/// [type-changed, old order] [rename]. Columns are keyed by name.
///
/// If exactly one column disappeared and exactly one appeared, and both
/// share an affinity, the pair is reported as a single rename instead of an
/// add and a remove. Nothing distinguishes that from an unrelated drop plus
/// add of the same type.
#[must_use]
pub fn diff_fields(table_name: &str, old: &Table, new: &Table) -> Vec<Change> {
    let old_cols: HashMap<&str, &Field> = old
        .fields
        .iter()
        .map(|f| (f.column_name.as_str(), f))
        .collect();
    let new_cols: HashMap<&str, &Field> = new
        .fields
        .iter()
        .map(|f| (f.column_name.as_str(), f))
        .collect();

    let added: Vec<&Field> = new
        .fields
        .iter()
        .filter(|f| !old_cols.contains_key(f.column_name.as_str()))
        .collect();
    let removed: Vec<&Field> = old
        .fields
        .iter()
        .filter(|f| !new_cols.contains_key(f.column_name.as_str()))
        .collect();
    let retyped: Vec<(&Field, &Field)> = old
        .fields
        .iter()
        .filter_map(|old_col| {
            new_cols
                .get(old_col.column_name.as_str())
                .filter(|new_col| new_col.affinity != old_col.affinity)
                .map(|new_col| (old_col, *new_col))
        })
        .collect();

    let rename = probable_rename(&removed, &added);
    if let Some((from, to)) = rename {
        info!(
            table = table_name,
            from = from.column_name.as_str(),
            to = to.column_name.as_str(),
            "treating column pair as rename"
        );
    }
    let renamed_from = rename.map(|(from, _)| from.column_name.as_str());
    let renamed_to = rename.map(|(_, to)| to.column_name.as_str());

    let mut changes = Vec::new();
    changes.extend(
        added
            .iter()
            .filter(|f| Some(f.column_name.as_str()) != renamed_to)
            .map(|f| Change::column_added(table_name, f)),
    );
    changes.extend(
        removed
            .iter()
            .filter(|f| Some(f.column_name.as_str()) != renamed_from)
            .map(|f| Change::column_removed(table_name, &f.column_name)),
    );
    changes.extend(
        retyped
            .iter()
            .map(|(old_col, new_col)| Change::column_type_changed(table_name, old_col, new_col)),
    );
    if let Some((from, to)) = rename {
        changes.push(Change::column_renamed(
            table_name,
            &from.column_name,
            &to.column_name,
        ));
    }
    changes
}

/// Pairs a lone removed column with a lone added one of the same affinity.
fn probable_rename<'a>(
    removed: &[&'a Field],
    added: &[&'a Field],
) -> Option<(&'a Field, &'a Field)> {
    match (removed, added) {
        ([from], [to]) if from.affinity == to.affinity => Some((*from, *to)),
        _ => None,
    }
}
