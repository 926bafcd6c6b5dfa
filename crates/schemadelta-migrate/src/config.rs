//! Configuration file parsing.
//!
//! Reads `schemadelta.toml`. Every key is optional; command-line flags
//! override whatever the file sets.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::emit::Format;
use crate::error::{MigrateError, Result};

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "schemadelta.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub codegen: CodegenConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InputConfig {
    /// Directory holding one `<version>.json` snapshot per schema version
    #[serde(default = "default_schemas_dir")]
    pub schemas_dir: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            schemas_dir: default_schemas_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory generated artifacts are written to
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Artifact formats to generate
    #[serde(default = "default_formats")]
    pub formats: Vec<Format>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            formats: default_formats(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CodegenConfig {
    /// Package declaration for generated Kotlin files
    #[serde(default)]
    pub package: Option<String>,
}

fn default_schemas_dir() -> PathBuf {
    PathBuf::from("schemas")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("generated")
}

fn default_formats() -> Vec<Format> {
    vec![Format::Sql, Format::Kotlin, Format::Markdown]
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not valid configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(path, &content)
    }

    /// Resolves the configuration to use.
    ///
    /// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] in
    /// `base_dir` is used if present, and defaults otherwise.
    ///
    /// # Errors
    ///
    /// Fails if an explicit path does not exist or a file cannot be parsed.
    pub fn discover(explicit: Option<&Path>, base_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(MigrateError::ConfigNotFound(path.to_path_buf()));
            }
            return Self::load(path);
        }

        let fallback = base_dir.join(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            Self::load(&fallback)
        } else {
            Ok(Self::default())
        }
    }

    fn parse(path: &Path, content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|source| MigrateError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
