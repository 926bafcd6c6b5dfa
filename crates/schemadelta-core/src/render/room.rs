//! Annotation syntax consumed by `AutoMigrationSpec` classes.

use crate::change::AutoDirective;

use super::DirectiveSyntax;

/// Renders directives as `@DeleteTable`, `@DeleteColumn` and
/// `@RenameColumn` annotations.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomAnnotations;

impl RoomAnnotations {
    /// Creates the annotation renderer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DirectiveSyntax for RoomAnnotations {
    fn name(&self) -> &'static str {
        "room"
    }

    fn render(&self, directive: &AutoDirective) -> String {
        match directive {
            AutoDirective::DeleteTable { table } => {
                format!("@DeleteTable(tableName = \"{table}\")")
            }
            AutoDirective::DeleteColumn { table, column } => {
                format!("@DeleteColumn(tableName = \"{table}\", columnName = \"{column}\")")
            }
            AutoDirective::RenameColumn { table, from, to } => format!(
                "@RenameColumn(tableName = \"{table}\", fromColumnName = \"{from}\", toColumnName = \"{to}\")"
            ),
        }
    }
}
