//! Multi-company run command
//!
//! Reads `<input-dir>/<slug>.json` for each selected company and commits
//! them one at a time. A company that fails is reported and skipped.

use clap::Args;
use insidertrack_core::errors::{io_error, ExError};
use insidertrack_core::{EntityKey, Snapshot};
use insidertrack_engine::EntityOutcome;
use std::path::{Path, PathBuf};

use super::commit::print_report;
use super::{open_coordinator, parse_key};
use crate::config::CliConfig;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Process every configured company (the default)
    #[arg(long, conflicts_with = "companies")]
    pub all: bool,

    /// Process only these companies
    #[arg(long, num_args = 1..)]
    pub companies: Vec<String>,

    /// Directory holding one fetched snapshot per company
    #[arg(long)]
    pub input_dir: PathBuf,
}

pub fn execute(args: RunArgs, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let keys = select_companies(&args, config)?;
    if keys.is_empty() {
        return Err("no companies configured".into());
    }

    let coordinator = open_coordinator(config)?;
    let fetched = keys.into_iter().map(|key| {
        let snapshot = read_snapshot(&args.input_dir, &key);
        (key, snapshot)
    });
    let summary = coordinator.run(fetched);

    for outcome in summary.outcomes() {
        match outcome {
            EntityOutcome::Committed { key, report } => print_report(key.as_str(), report),
            EntityOutcome::Partial { key, report, error } => {
                print_report(key.as_str(), report);
                println!("{}: PARTIAL {}", key, error);
            }
            EntityOutcome::Failed { key, error } => println!("{}: FAILED {}", key, error),
        }
    }
    println!("{}", summary);

    if summary.has_failures() {
        return Err(format!("{} of {} companies failed", summary.failed(), summary.outcomes().len()).into());
    }
    Ok(())
}

/// Resolve the requested slugs, rejecting any that are not configured
fn select_companies(
    args: &RunArgs,
    config: &CliConfig,
) -> Result<Vec<EntityKey>, Box<dyn std::error::Error>> {
    if args.all || args.companies.is_empty() {
        return config.companies.iter().map(|c| parse_key(&c.slug)).collect();
    }

    let unknown: Vec<&str> = args
        .companies
        .iter()
        .filter(|slug| config.company(slug).is_none())
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        return Err(format!("unknown companies: {}", unknown.join(", ")).into());
    }
    args.companies.iter().map(|slug| parse_key(slug)).collect()
}

fn read_snapshot(input_dir: &Path, key: &EntityKey) -> Result<Snapshot, ExError> {
    let path = input_dir.join(format!("{}.json", key));
    let bytes = std::fs::read(&path)
        .map_err(|e| io_error("read_input", e).with_entity_key(key.as_str()))?;
    Snapshot::from_json_slice(&bytes).map_err(|e| e.with_entity_key(key.as_str()))
}
