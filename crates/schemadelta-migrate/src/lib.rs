//! Migration generator for exported schema snapshots.
//!
//! Loads a directory of `<version>.json` snapshots, plans every adjacent
//! version transition with [`schemadelta_core`], and writes the results as
//! SQL scripts, Kotlin migrations for Room and a Markdown changelog.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use schemadelta_migrate::prelude::*;
//!
//! let outcomes = plan_dir(Path::new("schemas")).unwrap();
//! let artifacts = render_artifacts(&outcomes, &[Format::Sql, Format::Markdown], None);
//! write_artifacts(Path::new("generated"), &artifacts).unwrap();
//! ```

pub mod config;
pub mod emit;
pub mod error;
pub mod loader;

use std::path::Path;

use schemadelta_core::planner::{PairOutcome, plan_sequence};
use schemadelta_core::render::{RoomAnnotations, SqliteDialect};
use serde::Serialize;

pub use error::{MigrateError, Result};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::emit::{Artifact, Format, render_artifacts, write_artifacts};
    pub use crate::error::{MigrateError, Result};
    pub use crate::loader::load_snapshot_dir;
    pub use crate::{TransitionSummary, plan_dir, summaries_json};
}

/// Loads every snapshot in `dir` and plans all adjacent transitions for
/// SQLite and Room.
///
/// # Errors
///
/// Fails only if the directory cannot be listed. Broken snapshots surface as
/// failed outcomes.
pub fn plan_dir(dir: &Path) -> Result<Vec<PairOutcome>> {
    let snapshots = loader::load_snapshot_dir(dir)?;
    Ok(plan_sequence(
        snapshots,
        &SqliteDialect::new(),
        &RoomAnnotations::new(),
    ))
}

/// Machine-readable summary of one planned transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionSummary {
    pub from_version: i64,
    pub to_version: i64,
    /// Verdict label, absent when planning failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub changes: Vec<String>,
    pub sql_statements: Vec<String>,
    pub auto_directives: Vec<String>,
}

impl From<&PairOutcome> for TransitionSummary {
    fn from(outcome: &PairOutcome) -> Self {
        let mut summary = Self {
            from_version: outcome.from_version,
            to_version: outcome.to_version,
            verdict: None,
            error: None,
            changes: Vec::new(),
            sql_statements: Vec::new(),
            auto_directives: Vec::new(),
        };
        match &outcome.result {
            Ok(migration) => {
                summary.verdict = Some(migration.verdict().to_string());
                summary.changes = migration
                    .changes()
                    .map(|c| c.description.clone())
                    .collect();
                summary.sql_statements.clone_from(&migration.sql_statements);
                summary.auto_directives.clone_from(&migration.auto_directives);
            }
            Err(err) => summary.error = Some(err.to_string()),
        }
        summary
    }
}

/// Serializes the summaries of `outcomes` as pretty-printed JSON.
///
/// # Errors
///
/// Fails only if serialization fails.
pub fn summaries_json(outcomes: &[PairOutcome]) -> Result<String> {
    let summaries: Vec<TransitionSummary> = outcomes.iter().map(Into::into).collect();
    Ok(serde_json::to_string_pretty(&summaries)?)
}

#[cfg(test)]
mod tests {
    use schemadelta_core::error::PlanError;

    use super::*;

    #[test]
    fn failed_outcome_summary_has_error_and_no_verdict() {
        let outcome = PairOutcome {
            from_version: 1,
            to_version: 1,
            result: Err(PlanError::DuplicateVersion(1)),
        };
        let json = summaries_json(&[outcome]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["error"], "duplicate snapshot version 1");
        assert!(value[0].get("verdict").is_none());
        assert_eq!(value[0]["changes"], serde_json::json!([]));
    }
}
