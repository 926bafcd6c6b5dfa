//! Sequential planning over a run of snapshots.
//!
//! Each adjacent pair of versions is planned on its own: the outcome of a
//! pair depends on exactly its two snapshots, and a pair that fails does not
//! stop the pairs after it.

use tracing::{debug, warn};

use crate::diff::diff_snapshots;
use crate::error::{PlanError, SchemaError};
use crate::migration::Migration;
use crate::render::{DirectiveSyntax, SqlDialect};
use crate::snapshot::Snapshot;

/// A snapshot as delivered by a loader: either parsed, or the error that
/// prevented it. Both know their version.
pub type LoadedSnapshot = Result<Snapshot, SchemaError>;

/// The result of planning one version transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairOutcome {
    /// Older version.
    pub from_version: i64,
    /// Newer version.
    pub to_version: i64,
    /// The migration, or why it could not be produced.
    pub result: Result<Migration, PlanError>,
}

impl PairOutcome {
    /// Returns the migration if the pair was planned.
    #[must_use]
    pub fn migration(&self) -> Option<&Migration> {
        self.result.as_ref().ok()
    }

    /// Returns `true` if the pair failed.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        self.result.is_err()
    }
}

fn version_of(entry: &LoadedSnapshot) -> i64 {
    match entry {
        Ok(snapshot) => snapshot.version,
        Err(err) => err.version(),
    }
}

/// Plans every adjacent pair of `snapshots`, in ascending version order.
///
/// Input order does not matter; entries are sorted by version first. The
/// returned outcomes are ordered by `from_version`, one per pair.
pub fn plan_sequence(
    mut snapshots: Vec<LoadedSnapshot>,
    dialect: &impl SqlDialect,
    syntax: &impl DirectiveSyntax,
) -> Vec<PairOutcome> {
    snapshots.sort_by_key(version_of);

    snapshots
        .windows(2)
        .map(|pair| plan_pair(&pair[0], &pair[1], dialect, syntax))
        .collect()
}

/// Plans a single transition from `old` to `new`.
pub fn plan_pair(
    old: &LoadedSnapshot,
    new: &LoadedSnapshot,
    dialect: &impl SqlDialect,
    syntax: &impl DirectiveSyntax,
) -> PairOutcome {
    let from_version = version_of(old);
    let to_version = version_of(new);

    let result = migrate_pair(old, new, dialect, syntax);
    match &result {
        Ok(migration) => debug!(
            from = from_version,
            to = to_version,
            verdict = %migration.verdict(),
            "planned transition"
        ),
        Err(err) => warn!(from = from_version, to = to_version, "{err}"),
    }

    PairOutcome {
        from_version,
        to_version,
        result,
    }
}

fn migrate_pair(
    old: &LoadedSnapshot,
    new: &LoadedSnapshot,
    dialect: &impl SqlDialect,
    syntax: &impl DirectiveSyntax,
) -> Result<Migration, PlanError> {
    let (from, to) = (version_of(old), version_of(new));
    if from == to {
        return Err(PlanError::DuplicateVersion(from));
    }

    let old = old.as_ref().map_err(unavailable)?;
    let new = new.as_ref().map_err(unavailable)?;

    let tables = diff_snapshots(old, new).map_err(|err| PlanError::Diff {
        from,
        to,
        reason: err.to_string(),
    })?;

    Ok(Migration::assemble(from, to, tables, dialect, syntax))
}

fn unavailable(err: &SchemaError) -> PlanError {
    PlanError::SnapshotUnavailable {
        version: err.version(),
        reason: err.to_string(),
    }
}
