//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "imd-sync")]
#[command(about = "Import the master profile sheet into the group database", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Upsert groups, external links, and profiles from the master sheet
    Import(ImportArgs),

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Where the import writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Backend {
    /// Supabase REST API (needs SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY)
    Postgrest,
    /// Local SQLite file
    Sqlite,
}

#[derive(Args, Clone)]
pub(crate) struct ImportArgs {
    /// Master sheet CSV (default: $CSV_PATH or data/MASTER_profile.csv)
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Only import rows whose importFlag is set and not "0"
    #[arg(long)]
    pub flagged_only: bool,

    /// Log planned writes without touching any backend
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Backend to write to
    #[arg(long, value_enum, default_value = "postgrest")]
    pub backend: Backend,

    /// SQLite database path for --backend sqlite
    #[arg(long, default_value = "imd.db")]
    pub db: PathBuf,

    /// Database schema for --backend postgrest (default: $SUPABASE_SCHEMA or imd)
    #[arg(long)]
    pub schema: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show resolved settings and where each came from
    Show,

    /// Print the config file path
    Path,
}
