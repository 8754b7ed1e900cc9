//! imd-sync CLI
//!
//! Command-line interface for importing the master profile sheet into the
//! group database.

mod cli_types;
mod commands;
mod config;
mod error;
mod logging;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.quiet, cli.verbose);

    let result = match cli.command {
        Commands::Import(args) => commands::import::run_import(args),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Path => commands::config::run_config_path(),
        },
    };

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
