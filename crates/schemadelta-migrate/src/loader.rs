//! Snapshot discovery.
//!
//! The exporter writes one `<version>.json` file per schema version into a
//! single directory. Each file is loaded on its own; a file that cannot be
//! read or parsed becomes an error entry for its version instead of failing
//! the whole load.

use std::path::Path;

use schemadelta_core::SchemaError;
use schemadelta_core::planner::LoadedSnapshot;
use schemadelta_core::snapshot::Snapshot;
use tracing::{debug, warn};

use crate::error::{MigrateError, Result};

/// Loads every `<version>.json` snapshot in `dir`, sorted by version.
///
/// Files whose stem is not an integer are skipped.
///
/// # Errors
///
/// Fails only if the directory itself is missing or cannot be listed.
pub fn load_snapshot_dir(dir: &Path) -> Result<Vec<LoadedSnapshot>> {
    if !dir.is_dir() {
        return Err(MigrateError::SnapshotDirNotFound(dir.to_path_buf()));
    }

    let mut snapshots = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(version) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<i64>().ok())
        else {
            warn!("Skipping {}: file name is not a schema version", path.display());
            continue;
        };

        debug!("Loading snapshot {} from {}", version, path.display());
        snapshots.push(load_snapshot(version, &path));
    }

    snapshots.sort_by_key(|entry| match entry {
        Ok(snapshot) => snapshot.version,
        Err(err) => err.version(),
    });
    Ok(snapshots)
}

/// Loads the snapshot for `version` from `path`.
pub fn load_snapshot(version: i64, path: &Path) -> LoadedSnapshot {
    let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Load {
        version,
        path: path.to_path_buf(),
        source,
    })?;
    Snapshot::parse(version, &text)
}
