//! Migration assembly and classification.
//!
//! [`Migration::assemble`] folds the ordered change list of one version
//! transition into rendered SQL lines, rendered directive lines and a
//! verdict.

use std::fmt;

use serde::Serialize;

use crate::change::{Change, TableComparison};
use crate::render::{DirectiveSyntax, SqlDialect};

/// How a version transition can be migrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Verdict {
    /// Nothing changed; no migration is needed.
    NoChange,
    /// Every change can be expressed through directives.
    AutoMigration,
    /// A migration has to be written (or generated) as statements.
    ManualMigration,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoChange => f.write_str("no change"),
            Self::AutoMigration => f.write_str("auto migration"),
            Self::ManualMigration => f.write_str("manual migration"),
        }
    }
}

/// The assembled migration for one version transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Migration {
    /// Older version.
    pub from_version: i64,
    /// Newer version.
    pub to_version: i64,
    /// A comment line followed by the statement, per SQL-bearing change.
    pub sql_statements: Vec<String>,
    /// A comment line followed by the directive, per directive-bearing change.
    pub auto_directives: Vec<String>,
    /// Whether any change needs hand-written logic.
    pub requires_manual: bool,
    /// Whether the transition can be handled by directives alone.
    pub is_auto_eligible: bool,
    /// The per-table changes this migration was assembled from.
    pub tables: Vec<TableComparison>,
}

#[derive(Default)]
struct Assembly {
    sql_statements: Vec<String>,
    auto_directives: Vec<String>,
    requires_manual: bool,
}

impl Migration {
    /// Assembles the migration from `from_version` to `to_version`.
    ///
    /// Walks the changes in the order given (tables in comparison order,
    /// changes in discovery order). The transition is auto-eligible only if
    /// no change requires manual work and at least one directive was
    /// produced; a transition without changes is therefore not auto-eligible.
    #[must_use]
    pub fn assemble(
        from_version: i64,
        to_version: i64,
        tables: Vec<TableComparison>,
        dialect: &impl SqlDialect,
        syntax: &impl DirectiveSyntax,
    ) -> Self {
        let assembly = tables
            .iter()
            .flat_map(|t| t.changes.iter())
            .fold(Assembly::default(), |mut acc, change| {
                if let Some(statement) = &change.sql {
                    acc.sql_statements.push(dialect.comment(&change.description));
                    acc.sql_statements.push(dialect.render(statement));
                }
                if let Some(directive) = &change.directive {
                    acc.auto_directives.push(syntax.comment(&change.description));
                    acc.auto_directives.push(syntax.render(directive));
                }
                acc.requires_manual |= change.requires_manual;
                acc
            });

        let is_auto_eligible = !assembly.requires_manual && !assembly.auto_directives.is_empty();

        Self {
            from_version,
            to_version,
            sql_statements: assembly.sql_statements,
            auto_directives: assembly.auto_directives,
            requires_manual: assembly.requires_manual,
            is_auto_eligible,
            tables,
        }
    }

    /// Iterates over every change in order.
    pub fn changes(&self) -> impl Iterator<Item = &Change> {
        self.tables.iter().flat_map(|t| t.changes.iter())
    }

    /// Iterates over the changes that need hand-written logic.
    pub fn manual_changes(&self) -> impl Iterator<Item = &Change> {
        self.changes().filter(|c| c.requires_manual)
    }

    /// Returns `true` if no change was detected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes().next().is_none()
    }

    /// Classifies the transition.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        if self.is_empty() {
            Verdict::NoChange
        } else if self.is_auto_eligible {
            Verdict::AutoMigration
        } else {
            Verdict::ManualMigration
        }
    }

    /// Returns `(comment, statement)` pairs of the SQL lines.
    pub fn sql_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sql_statements
            .chunks_exact(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }

    /// Returns `(comment, directive)` pairs of the directive lines.
    pub fn directive_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.auto_directives
            .chunks_exact(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }
}
