mod commands;
mod config;

use actreport_events::TracingEventBus;
use actreport_session::{ExportTarget, ReportSession};
use actreport_storage::{Database, ReportStore};
use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::{Edits, Format};
use config::AppConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Fill in, store and export academic activity reports.
#[derive(Parser, Debug)]
#[command(name = "actreport")]
#[command(version, about)]
struct Cli {
    /// Config file (default: $ACTREPORT_CONFIG or the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the report database
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List saved reports
    List,

    /// Print a saved report as it appears on the page
    Show {
        id: String,
        /// Print the stored JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Create and save a new report
    New {
        /// Field assignment, e.g. --set activityTitle="Science Fair"
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
        /// Documentation item to tick, by number or label
        #[arg(long = "check", value_name = "ITEM")]
        check: Vec<String>,
    },

    /// Edit a saved report in place
    Edit {
        id: String,
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
        #[arg(long = "check", value_name = "ITEM")]
        check: Vec<String>,
        #[arg(long = "uncheck", value_name = "ITEM")]
        uncheck: Vec<String>,
    },

    /// Save every report in a JSON file as a new report
    Import { file: PathBuf },

    /// Delete a saved report
    Delete { id: String },

    /// Export a saved report, or an unsaved one read from a file
    Export {
        /// Id of the saved report
        #[arg(required_unless_present = "current_file", conflicts_with = "current_file")]
        id: Option<String>,
        /// Export this JSON report without saving it
        #[arg(long)]
        current_file: Option<PathBuf>,
        /// Output directory (default: export_dir from config)
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "pdf")]
        format: Format,
    },

    /// List editable fields and documentation items
    Fields,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    let config = AppConfig::load(&config_path)?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .init();

    tracing::debug!("Using config {}", config_path.display());

    if let Command::Fields = cli.command {
        commands::fields();
        return Ok(());
    }

    let data_dir = config.data_dir(cli.data_dir.as_deref());
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data dir {}", data_dir.display()))?;
    let db_path = config.database_path(cli.data_dir.as_deref());
    let db = Database::open(&db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    tracing::info!("Opened report database at {}", db_path.display());

    let mut session = ReportSession::new(ReportStore::open(db), Arc::new(TracingEventBus))
        .with_options(config.preview_options());

    match cli.command {
        Command::List => commands::list(&session),
        Command::Show { id, json } => commands::show(&session, &id, json)?,
        Command::New { set, check } => {
            let edits = Edits {
                set,
                check,
                uncheck: Vec::new(),
            };
            commands::new(&mut session, &edits)?
        }
        Command::Edit {
            id,
            set,
            check,
            uncheck,
        } => commands::edit(&mut session, &id, &Edits { set, check, uncheck })?,
        Command::Import { file } => commands::import(&mut session, &file)?,
        Command::Delete { id } => commands::delete(&mut session, &id)?,
        Command::Export {
            id,
            current_file,
            out,
            format,
        } => {
            let target = match (id, current_file) {
                (Some(id), _) => ExportTarget::Saved(id),
                (None, Some(file)) => {
                    commands::load_current(&mut session, &file)?;
                    ExportTarget::Current
                }
                (None, None) => anyhow::bail!("Give a report id or --current-file"),
            };
            commands::export(&mut session, &config, target, format, out.as_deref())?
        }
        Command::Fields => commands::fields(),
    }

    Ok(())
}
