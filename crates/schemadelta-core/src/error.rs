//! Error types for snapshot handling and migration planning.

use std::path::PathBuf;

/// Errors raised while loading, parsing or validating a schema snapshot.
///
/// Every variant carries the schema version it belongs to so that a
/// planner can attribute the failure to the transitions that need it.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The snapshot file could not be read.
    #[error("failed to load snapshot for version {version} from '{}': {source}", path.display())]
    Load {
        /// Version the file was expected to describe.
        version: i64,
        /// Path of the snapshot file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The snapshot is not valid JSON or misses a required field.
    #[error("failed to parse snapshot for version {version}: {source}")]
    Parse {
        /// Version of the snapshot.
        version: i64,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The snapshot parsed but violates a structural invariant.
    #[error("malformed snapshot for version {version}: {message}")]
    Structural {
        /// Version of the snapshot.
        version: i64,
        /// What is wrong with it.
        message: String,
    },
}

impl SchemaError {
    /// Returns the schema version this error belongs to.
    #[must_use]
    pub const fn version(&self) -> i64 {
        match self {
            Self::Load { version, .. }
            | Self::Parse { version, .. }
            | Self::Structural { version, .. } => *version,
        }
    }

    pub(crate) fn structural(version: i64, message: impl Into<String>) -> Self {
        Self::Structural {
            version,
            message: message.into(),
        }
    }
}

/// Errors reported for a single version transition by the planner.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// One of the two snapshots of the pair could not be loaded.
    #[error("snapshot {version} unavailable: {reason}")]
    SnapshotUnavailable {
        /// Version of the failed snapshot.
        version: i64,
        /// Rendered load or parse error.
        reason: String,
    },

    /// The pair could not be diffed.
    #[error("cannot diff version {from} against {to}: {reason}")]
    Diff {
        /// Older version.
        from: i64,
        /// Newer version.
        to: i64,
        /// Rendered structural error.
        reason: String,
    },

    /// Two snapshots claim the same version.
    #[error("duplicate snapshot version {0}")]
    DuplicateVersion(i64),
}

/// Result type for snapshot operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
