//! Kotlin migration sources for Room databases.
//!
//! An auto-eligible transition becomes an `AutoMigrationSpec` class carrying
//! the directives as annotations. Any other transition with changes becomes
//! a `Migration` object that replays the SQL statements and marks every
//! change it cannot express.

use std::collections::BTreeSet;

use schemadelta_core::change::{AutoDirective, Change};
use schemadelta_core::migration::{Migration, Verdict};

const AUTO_MIGRATION_SPEC: &str = "androidx.room.migration.AutoMigrationSpec";
const MIGRATION: &str = "androidx.room.migration.Migration";
const SUPPORT_DATABASE: &str = "androidx.sqlite.db.SupportSQLiteDatabase";

/// Name of the source file for a transition.
#[must_use]
pub fn file_name(from: i64, to: i64) -> String {
    format!("Migration{from}To{to}.kt")
}

/// Renders the Kotlin source for `migration`, or `None` if nothing changed.
#[must_use]
pub fn render_migration(migration: &Migration, package: Option<&str>) -> Option<String> {
    match migration.verdict() {
        Verdict::NoChange => None,
        Verdict::AutoMigration => Some(render_auto(migration, package)),
        Verdict::ManualMigration => Some(render_manual(migration, package)),
    }
}

fn render_auto(migration: &Migration, package: Option<&str>) -> String {
    let (from, to) = (migration.from_version, migration.to_version);
    let class_name = format!("AutoMigration{from}To{to}");

    let mut imports: BTreeSet<&str> = migration
        .changes()
        .filter_map(|c| c.directive.as_ref())
        .map(annotation_import)
        .collect();
    imports.insert(AUTO_MIGRATION_SPEC);

    let mut out = header(migration, package, &imports);
    out.push_str(&format!(
        "// Register on the database:\n\
         // @AutoMigration(from = {from}, to = {to}, spec = {class_name}::class)\n"
    ));
    for (comment, directive) in migration.directive_pairs() {
        out.push_str(comment);
        out.push('\n');
        out.push_str(directive);
        out.push('\n');
    }
    out.push_str(&format!("class {class_name} : AutoMigrationSpec\n"));
    out
}

fn render_manual(migration: &Migration, package: Option<&str>) -> String {
    let (from, to) = (migration.from_version, migration.to_version);
    let imports = BTreeSet::from([MIGRATION, SUPPORT_DATABASE]);

    let mut out = header(migration, package, &imports);
    out.push_str(&format!(
        "val MIGRATION_{from}_{to} = object : Migration({from}, {to}) {{\n\
         \x20   override fun migrate(db: SupportSQLiteDatabase) {{\n"
    ));

    // Statements were rendered in change order, one pair per SQL-bearing change.
    let mut statements = migration.sql_pairs();
    for change in migration.changes() {
        let statement = if change.sql.is_some() {
            statements.next()
        } else {
            None
        };
        match statement {
            Some((_, sql)) => {
                out.push_str(&format!(
                    "        // {}\n        db.execSQL(\"{}\")\n",
                    change.description,
                    escape(sql)
                ));
                if change.requires_manual {
                    out.push_str(&manual_marker(change));
                }
            }
            None => out.push_str(&manual_marker(change)),
        }
    }

    out.push_str("    }\n}\n");
    out
}

fn header(migration: &Migration, package: Option<&str>, imports: &BTreeSet<&str>) -> String {
    let mut out = format!(
        "// Generated by schemadelta: version {} -> {} ({})\n",
        migration.from_version,
        migration.to_version,
        migration.verdict()
    );
    if let Some(package) = package {
        out.push_str(&format!("package {package}\n"));
    }
    out.push('\n');
    for import in imports {
        out.push_str(&format!("import {import}\n"));
    }
    out.push('\n');
    out
}

fn manual_marker(change: &Change) -> String {
    format!(
        "        // TODO: write migration logic for: {}\n",
        change.description
    )
}

const fn annotation_import(directive: &AutoDirective) -> &'static str {
    match directive {
        AutoDirective::DeleteTable { .. } => "androidx.room.DeleteTable",
        AutoDirective::DeleteColumn { .. } => "androidx.room.DeleteColumn",
        AutoDirective::RenameColumn { .. } => "androidx.room.RenameColumn",
    }
}

/// Escapes `s` for a Kotlin string literal.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            _ => out.push(ch),
        }
    }
    out
}
