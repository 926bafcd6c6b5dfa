//! SQLite statement rendering.
//!
//! Identifiers are emitted unquoted, matching the exporter's column names.
//! Create statements come from the snapshot and are passed through.

use super::SqlDialect;

/// SQLite dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SqlDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }
}
