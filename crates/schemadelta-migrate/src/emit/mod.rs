//! Artifact generation.
//!
//! Turns planned version transitions into files: a SQL script and a Kotlin
//! migration per transition, and a single changelog for the whole run.

pub mod kotlin;
pub mod markdown;
pub mod sql;

use std::fmt;
use std::path::{Path, PathBuf};

use schemadelta_core::planner::PairOutcome;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;

/// Kinds of artifacts the generator can write.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// `migration_<from>_<to>.sql`
    Sql,
    /// `Migration<from>To<to>.kt`
    Kotlin,
    /// `CHANGELOG.md`
    Markdown,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sql => f.write_str("sql"),
            Self::Kotlin => f.write_str("kotlin"),
            Self::Markdown => f.write_str("markdown"),
        }
    }
}

/// A generated file, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub contents: String,
}

impl Artifact {
    fn new(file_name: impl Into<String>, contents: String) -> Self {
        Self {
            file_name: file_name.into(),
            contents,
        }
    }
}

/// Renders the artifacts for `outcomes` in the requested formats.
///
/// Failed pairs produce no per-transition artifacts; they only appear in the
/// changelog. Transitions without anything to write are skipped.
#[must_use]
pub fn render_artifacts(
    outcomes: &[PairOutcome],
    formats: &[Format],
    package: Option<&str>,
) -> Vec<Artifact> {
    let mut artifacts = Vec::new();

    for migration in outcomes.iter().filter_map(PairOutcome::migration) {
        let (from, to) = (migration.from_version, migration.to_version);

        if formats.contains(&Format::Sql) {
            match sql::render_script(migration) {
                Some(script) => artifacts.push(Artifact::new(sql::file_name(from, to), script)),
                None => debug!("No SQL for {} -> {}", from, to),
            }
        }
        if formats.contains(&Format::Kotlin) {
            match kotlin::render_migration(migration, package) {
                Some(code) => artifacts.push(Artifact::new(kotlin::file_name(from, to), code)),
                None => debug!("No Kotlin migration for {} -> {}", from, to),
            }
        }
    }

    if formats.contains(&Format::Markdown) && !outcomes.is_empty() {
        artifacts.push(Artifact::new(
            markdown::FILE_NAME,
            markdown::render_changelog(outcomes),
        ));
    }

    artifacts
}

/// Writes `artifacts` into `dir`, creating it if needed.
///
/// # Errors
///
/// Fails on the first file that cannot be written.
pub fn write_artifacts(dir: &Path, artifacts: &[Artifact]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = dir.join(&artifact.file_name);
        std::fs::write(&path, &artifact.contents)?;
        info!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use schemadelta_core::prelude::*;

    use super::*;

    fn outcomes() -> Vec<PairOutcome> {
        let v1 = Snapshot::new(1).table(
            Table::new("users", "CREATE TABLE users (id INTEGER NOT NULL, name TEXT)")
                .field(Field::new("id", "INTEGER").not_null())
                .field(Field::new("name", "TEXT")),
        );
        let v2 = Snapshot::new(2).table(
            Table::new("users", "CREATE TABLE users (id INTEGER NOT NULL)")
                .field(Field::new("id", "INTEGER").not_null()),
        );
        plan_sequence(
            vec![Ok(v1), Ok(v2)],
            &SqliteDialect::new(),
            &RoomAnnotations::new(),
        )
    }

    #[test]
    fn renders_only_requested_formats() {
        let artifacts = render_artifacts(&outcomes(), &[Format::Kotlin], None);
        let names: Vec<_> = artifacts.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(names, vec!["Migration1To2.kt"]);
    }

    #[test]
    fn directive_only_transition_has_no_sql_script() {
        let artifacts = render_artifacts(
            &outcomes(),
            &[Format::Sql, Format::Kotlin, Format::Markdown],
            None,
        );
        let names: Vec<_> = artifacts.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(names, vec!["Migration1To2.kt", "CHANGELOG.md"]);
    }

    #[test]
    fn writes_into_a_fresh_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("generated");
        let artifacts = vec![Artifact::new("a.sql", "SELECT 1;\n".to_string())];

        let written = write_artifacts(&out, &artifacts).unwrap();

        assert_eq!(written, vec![out.join("a.sql")]);
        assert_eq!(std::fs::read_to_string(&written[0]).unwrap(), "SELECT 1;\n");
    }

    #[test]
    fn format_names_match_config_spelling() {
        assert_eq!(Format::Markdown.to_string(), "markdown");
        let parsed: Vec<Format> = serde_json::from_str(r#"["sql","kotlin"]"#).unwrap();
        assert_eq!(parsed, vec![Format::Sql, Format::Kotlin]);
    }
}
