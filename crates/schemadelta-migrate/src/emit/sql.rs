//! Plain SQL migration scripts.

use schemadelta_core::migration::Migration;

/// Name of the script for a transition.
#[must_use]
pub fn file_name(from: i64, to: i64) -> String {
    format!("migration_{from}_{to}.sql")
}

/// Renders the SQL script for `migration`, or `None` if no change produced
/// a statement.
#[must_use]
pub fn render_script(migration: &Migration) -> Option<String> {
    if migration.sql_statements.is_empty() {
        return None;
    }

    let mut out = format!(
        "-- Migration from version {} to {}\n-- Verdict: {}\n",
        migration.from_version,
        migration.to_version,
        migration.verdict()
    );
    for (comment, statement) in migration.sql_pairs() {
        out.push('\n');
        out.push_str(comment);
        out.push('\n');
        out.push_str(statement);
        out.push_str(";\n");
    }
    Some(out)
}
