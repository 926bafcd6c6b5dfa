//! Error types for the migration generator.

use std::path::PathBuf;

/// Errors that can occur while loading inputs or writing artifacts.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// IO error (reading snapshots, writing artifacts).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("Failed to parse config file '{path}': {source}")]
    Config {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// An explicitly requested configuration file does not exist.
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// No snapshot directory found.
    #[error("Snapshot directory not found: {0}")]
    SnapshotDirNotFound(PathBuf),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for generator operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
