//! Human-readable changelog of every planned transition.

use schemadelta_core::planner::PairOutcome;

/// Name of the changelog file.
pub const FILE_NAME: &str = "CHANGELOG.md";

/// Renders the changelog for `outcomes`, newest transition first.
#[must_use]
pub fn render_changelog(outcomes: &[PairOutcome]) -> String {
    let mut out = String::from("# Schema changelog\n");

    for outcome in outcomes.iter().rev() {
        out.push_str(&format!(
            "\n## Version {} -> {}\n\n",
            outcome.from_version, outcome.to_version
        ));

        let migration = match &outcome.result {
            Ok(migration) => migration,
            Err(err) => {
                out.push_str(&format!("**Failed:** {err}\n"));
                continue;
            }
        };

        out.push_str(&format!("Verdict: {}\n", migration.verdict()));
        if migration.is_empty() {
            continue;
        }

        out.push('\n');
        for change in migration.changes() {
            let marker = if change.requires_manual {
                " (manual)"
            } else {
                ""
            };
            out.push_str(&format!("- {}{marker}\n", change.description));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use schemadelta_core::prelude::*;

    use super::*;

    #[test]
    fn lists_changes_and_failures_newest_first() {
        let age = Table::new("users", "CREATE TABLE users (age INTEGER)")
            .field(Field::new("age", "INTEGER"));
        let age_text = Table::new("users", "CREATE TABLE users (age TEXT)")
            .field(Field::new("age", "TEXT"));

        let outcomes = plan_sequence(
            vec![
                Ok(Snapshot::new(1).table(age.clone())),
                Ok(Snapshot::new(2).table(age)),
                Ok(Snapshot::new(3).table(age_text)),
                Err(SchemaError::Structural {
                    version: 4,
                    message: "missing tableName".to_string(),
                }),
            ],
            &SqliteDialect::new(),
            &RoomAnnotations::new(),
        );

        assert_eq!(
            render_changelog(&outcomes),
            "# Schema changelog\n\
             \n\
             ## Version 3 -> 4\n\
             \n\
             **Failed:** snapshot 4 unavailable: malformed snapshot for version 4: missing tableName\n\
             \n\
             ## Version 2 -> 3\n\
             \n\
             Verdict: manual migration\n\
             \n\
             - Column `users`.`age` type changed from INTEGER to TEXT (manual)\n\
             \n\
             ## Version 1 -> 2\n\
             \n\
             Verdict: no change\n"
        );
    }
}
