//! oxide-schema-diff CLI
//!
//! Replays a migration history and diffs it against a live schema.

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use oxide_schema_diff::prelude::*;

/// Schema snapshot replay and rename-aware diffing.
#[derive(Parser)]
#[command(name = "oxide-schema-diff")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Migration history file (JSON array of migrations).
    #[arg(long, env = "OXIDE_MIGRATION_HISTORY", default_value = "migrations.json")]
    history: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the schema the history produces, as JSON.
    Snapshot {
        /// Stop after this migration id.
        #[arg(long)]
        until: Option<String>,
    },

    /// Diff the live schema against the history.
    Diff {
        /// Live schema file (JSON array of tables).
        #[arg(short, long, env = "OXIDE_LIVE_SCHEMA")]
        schema: PathBuf,

        /// Fixed answer to every rename question (y, n or a candidate number).
        #[arg(long)]
        auto_input: Option<String>,

        /// Skip column rename detection.
        #[arg(long)]
        no_column_renames: bool,

        /// Print actions as JSON instead of manager calls.
        #[arg(long)]
        json: bool,
    },

    /// Print a fresh migration id.
    NewId,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

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

    match cli.command {
        Commands::Snapshot { until } => {
            let history = MigrationHistory::from_path(&cli.history)?;
            let snapshot = match until {
                Some(id) => history.snapshot_until(&id)?,
                None => history.snapshot()?,
            };
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }

        Commands::Diff {
            schema,
            auto_input,
            no_column_renames,
            json,
        } => {
            let history = MigrationHistory::from_path(&cli.history)?;
            let snapshot = history.snapshot()?;

            let text = std::fs::read_to_string(&schema)
                .with_context(|| format!("reading {}", schema.display()))?;
            let live: Vec<DiffableTable> = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", schema.display()))?;

            let mut options = DifferOptions::new();
            if no_column_renames {
                options = options.without_column_renames();
            }
            let differ = SchemaDiffer::with_options(&live, &snapshot, options);

            let diff = match auto_input {
                Some(answer) => differ.diff(&mut AutoInput::parse(&answer)?),
                None => differ.diff(&mut Interactive::stdio()),
            };

            if diff.is_empty() {
                info!("No changes detected.");
                return Ok(());
            }

            if json {
                let actions: Vec<&Action> = diff.operations().collect();
                println!("{}", serde_json::to_string_pretty(&actions)?);
            } else {
                for line in diff.render() {
                    println!("{}", line);
                }
            }
        }

        Commands::NewId => {
            println!("{}", generate_migration_id(Utc::now()));
        }
    }

    Ok(())
}
