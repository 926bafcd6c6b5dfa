//! Text rendering of statements and directives.
//!
//! The diff engine only produces structured [`SqlStatement`]s and
//! [`AutoDirective`]s. A [`SqlDialect`] and a [`DirectiveSyntax`] turn them
//! into lines, so another SQL flavour or annotation style can be swapped in
//! without touching classification.

mod room;
mod sqlite;

pub use room::RoomAnnotations;
pub use sqlite::SqliteDialect;

use crate::change::{AutoDirective, SqlStatement};
use crate::snapshot::Affinity;

/// Renders SQL statements and their comment lines.
pub trait SqlDialect {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Renders a comment line carrying `description`.
    fn comment(&self, description: &str) -> String {
        format!("-- {description}")
    }

    /// Renders a statement, without trailing terminator.
    fn render(&self, statement: &SqlStatement) -> String {
        match statement {
            SqlStatement::Verbatim(sql) => sql.clone(),
            SqlStatement::DropTable { table } => self.drop_table(table),
            SqlStatement::DropIndex { name } => self.drop_index(name),
            SqlStatement::AddColumn {
                table,
                column,
                affinity,
                not_null,
                default,
            } => self.add_column(table, column, affinity, *not_null, default.as_deref()),
        }
    }

    /// Generates SQL for DROP TABLE.
    fn drop_table(&self, table: &str) -> String {
        format!("DROP TABLE IF EXISTS {table}")
    }

    /// Generates SQL for DROP INDEX.
    fn drop_index(&self, name: &str) -> String {
        format!("DROP INDEX IF EXISTS {name}")
    }

    /// Generates SQL for ADD COLUMN.
    fn add_column(
        &self,
        table: &str,
        column: &str,
        affinity: &Affinity,
        not_null: bool,
        default: Option<&str>,
    ) -> String {
        let mut sql = format!("ALTER TABLE {table} ADD COLUMN {column} {affinity}");
        if not_null {
            sql.push_str(" NOT NULL");
        }
        if let Some(value) = default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&self.default_literal(affinity, value));
        }
        sql
    }

    /// Formats a default literal for a column of `affinity`.
    ///
    /// INTEGER and REAL literals are emitted as-is. Everything else is
    /// wrapped in single quotes; embedded quotes are not escaped.
    fn default_literal(&self, affinity: &Affinity, value: &str) -> String {
        if affinity.takes_bare_literal() {
            value.to_string()
        } else {
            format!("'{value}'")
        }
    }
}

/// Renders auto-migration directives and their comment lines.
pub trait DirectiveSyntax {
    /// Returns the syntax name.
    fn name(&self) -> &'static str;

    /// Renders a comment line carrying `description`.
    fn comment(&self, description: &str) -> String {
        format!("// {description}")
    }

    /// Renders a directive.
    fn render(&self, directive: &AutoDirective) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(affinity: Affinity, not_null: bool, default: Option<&str>) -> SqlStatement {
        SqlStatement::AddColumn {
            table: "t".into(),
            column: "foo".into(),
            affinity,
            not_null,
            default: default.map(String::from),
        }
    }

    #[test]
    fn integer_default_is_unquoted() {
        let sql = SqliteDialect::new().render(&add(Affinity::Integer, true, Some("5")));
        assert_eq!(sql, "ALTER TABLE t ADD COLUMN foo INTEGER NOT NULL DEFAULT 5");
    }

    #[test]
    fn real_default_is_unquoted() {
        let sql = SqliteDialect::new().render(&add(Affinity::Real, false, Some("1.5")));
        assert_eq!(sql, "ALTER TABLE t ADD COLUMN foo REAL DEFAULT 1.5");
    }

    #[test]
    fn text_default_is_quoted_without_escaping() {
        let sql = SqliteDialect::new().render(&add(Affinity::Text, true, Some("it's")));
        assert_eq!(sql, "ALTER TABLE t ADD COLUMN foo TEXT NOT NULL DEFAULT 'it's'");
    }

    #[test]
    fn unknown_affinity_default_is_quoted() {
        let sql = SqliteDialect::new().render(&add(
            Affinity::Other("UNDEFINED".into()),
            false,
            Some("x"),
        ));
        assert_eq!(sql, "ALTER TABLE t ADD COLUMN foo UNDEFINED DEFAULT 'x'");
    }

    #[test]
    fn nullable_column_without_default() {
        let sql = SqliteDialect::new().render(&add(Affinity::Blob, false, None));
        assert_eq!(sql, "ALTER TABLE t ADD COLUMN foo BLOB");
    }

    #[test]
    fn drop_statements() {
        let dialect = SqliteDialect::new();
        assert_eq!(
            dialect.render(&SqlStatement::DropTable { table: "t".into() }),
            "DROP TABLE IF EXISTS t"
        );
        assert_eq!(
            dialect.render(&SqlStatement::DropIndex {
                name: "index_t_a".into()
            }),
            "DROP INDEX IF EXISTS index_t_a"
        );
        assert_eq!(dialect.comment("Table `t` removed"), "-- Table `t` removed");
    }
}
