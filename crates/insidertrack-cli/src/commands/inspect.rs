//! Read-only inspection commands

use clap::Args;
use insidertrack_core::errors::{ExError, ExErrorKind};

use super::{open_coordinator, parse_key};
use crate::config::CliConfig;

#[derive(Debug, Args)]
pub struct KeyArgs {
    /// Entity key (company slug)
    #[arg(long)]
    pub key: String,
}

#[derive(Debug, Args)]
pub struct ChangesArgs {
    /// Entity key (company slug)
    #[arg(long)]
    pub key: String,

    /// Only the most recent N entries
    #[arg(long)]
    pub limit: Option<usize>,
}

pub fn execute_show(args: KeyArgs, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let key = parse_key(&args.key)?;
    let coordinator = open_coordinator(config)?;

    let Some(snapshot) = coordinator.get_current_snapshot(&key)? else {
        return Err(ExError::new(ExErrorKind::NotFound)
            .with_op("show")
            .with_entity_key(key.as_str())
            .with_message("no snapshot committed yet")
            .into());
    };
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

pub fn execute_changes(
    args: ChangesArgs,
    config: &CliConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let key = parse_key(&args.key)?;
    let coordinator = open_coordinator(config)?;

    let entries = coordinator.get_change_log(&key)?;
    let skip = args
        .limit
        .map_or(0, |limit| entries.len().saturating_sub(limit));
    for entry in &entries[skip..] {
        println!(
            "{} captured {}: {} new, {} removed{}",
            entry.timestamp,
            entry.scraped_at,
            entry.new_transactions,
            entry.removed_transactions,
            if entry.metrics_changed {
                ", metrics changed"
            } else {
                ""
            }
        );
    }
    Ok(())
}

pub fn execute_history(args: KeyArgs, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let key = parse_key(&args.key)?;
    let coordinator = open_coordinator(config)?;

    for id in coordinator.list_history(&key)? {
        println!("{}", id);
    }
    Ok(())
}
