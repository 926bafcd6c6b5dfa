//! schemadelta CLI
//!
//! Command-line tool for turning exported schema snapshots into migrations.

use std::path::PathBuf;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use schemadelta_core::planner::PairOutcome;
use schemadelta_migrate::prelude::*;

/// Diff schema snapshots and generate database migrations.
#[derive(Parser)]
#[command(name = "schemadelta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./schemadelta.toml if present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the verdict for every version transition.
    Plan {
        /// Directory holding `<version>.json` snapshots.
        #[arg(short, long, env = "SCHEMADELTA_SCHEMAS")]
        schemas: Option<PathBuf>,

        /// Print a JSON summary instead of one line per transition.
        #[arg(long)]
        json: bool,
    },

    /// Generate migration artifacts.
    Generate {
        /// Directory holding `<version>.json` snapshots.
        #[arg(short, long, env = "SCHEMADELTA_SCHEMAS")]
        schemas: Option<PathBuf>,

        /// Output directory.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Artifact format to generate (repeatable; all configured if omitted).
        #[arg(short, long = "format", value_enum)]
        formats: Vec<Format>,

        /// Package declaration for Kotlin sources.
        #[arg(short, long)]
        package: Option<String>,

        /// Print artifacts without writing files (dry run).
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::discover(cli.config.as_deref(), &std::env::current_dir()?)?;

    let outcomes = match cli.command {
        Commands::Plan { schemas, json } => {
            let schemas = schemas.unwrap_or(config.input.schemas_dir);
            info!("Planning snapshots in {}", schemas.display());
            let outcomes = plan_dir(&schemas)?;

            if json {
                println!("{}", summaries_json(&outcomes)?);
            } else {
                print_plan(&outcomes);
            }
            outcomes
        }

        Commands::Generate {
            schemas,
            out,
            formats,
            package,
            dry_run,
        } => {
            let schemas = schemas.unwrap_or(config.input.schemas_dir);
            let out = out.unwrap_or(config.output.dir);
            let formats = if formats.is_empty() {
                config.output.formats
            } else {
                formats
            };
            let package = package.or(config.codegen.package);

            info!("Planning snapshots in {}", schemas.display());
            let outcomes = plan_dir(&schemas)?;
            let artifacts = render_artifacts(&outcomes, &formats, package.as_deref());

            if dry_run {
                info!("Dry run mode - artifacts will be printed but not written.");
                for artifact in &artifacts {
                    println!("==> {} <==", artifact.file_name);
                    println!("{}", artifact.contents);
                }
            } else {
                let written = write_artifacts(&out, &artifacts)?;
                info!("Wrote {} artifact(s) to {}", written.len(), out.display());
            }
            outcomes
        }
    };

    let failed = outcomes.iter().filter(|o| o.is_failure()).count();
    if failed > 0 {
        bail!("{failed} transition(s) could not be planned");
    }
    Ok(())
}

fn print_plan(outcomes: &[PairOutcome]) {
    if outcomes.is_empty() {
        info!("Fewer than two snapshots found; nothing to plan.");
        return;
    }

    println!("\nTransitions:");
    println!("{:-<60}", "");
    for outcome in outcomes {
        match &outcome.result {
            Ok(migration) => println!(
                " {:>4} -> {:<4} {}",
                outcome.from_version,
                outcome.to_version,
                migration.verdict()
            ),
            Err(err) => println!(
                " {:>4} -> {:<4} FAILED: {err}",
                outcome.from_version, outcome.to_version
            ),
        }
    }
    println!();
}
