//! insidertrack CLI
//!
//! Commits fetched insider-trading snapshots and inspects what was recorded.

use clap::{Parser, Subcommand};
use insidertrack_core::logging_facility::{init, Profile};
use std::path::PathBuf;

mod commands;
mod config;

use config::{CliConfig, DATA_DIR_ENV, DEFAULT_CONFIG_FILE};

#[derive(Debug, Parser)]
#[command(name = "insidertrack")]
#[command(about = "insidertrack - insider transaction change tracking", long_about = None)]
struct Cli {
    /// Config file (optional unless given explicitly)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory, overrides the config file and INSIDERTRACK_DATA_DIR
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Emit JSON logs on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Commit one fetched snapshot
    Commit(commands::commit::CommitArgs),
    /// Commit fetched snapshots for configured companies
    Run(commands::run::RunArgs),
    /// Print the current snapshot
    Show(commands::inspect::KeyArgs),
    /// Print the change log
    Changes(commands::inspect::ChangesArgs),
    /// List history record ids
    History(commands::inspect::KeyArgs),
    /// List configured companies
    List,
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init(if cli.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    let result = load_config(&cli).and_then(|config| match cli.command {
        Commands::Commit(args) => commands::commit::execute(args, &config),
        Commands::Run(args) => commands::run::execute(args, &config),
        Commands::Show(args) => commands::inspect::execute_show(args, &config),
        Commands::Changes(args) => commands::inspect::execute_changes(args, &config),
        Commands::History(args) => commands::inspect::execute_history(args, &config),
        Commands::List => commands::list::execute(&config),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let (path, required) = match &cli.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    let mut config = CliConfig::load(&path, required)?;
    config.apply_overrides(std::env::var(DATA_DIR_ENV).ok(), cli.data_dir.clone());
    config.validate()?;
    Ok(config)
}
