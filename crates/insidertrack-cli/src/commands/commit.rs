//! Single-snapshot commit command
//!
//! A partial commit is resumed once; if history or the change log still
//! cannot be written the report is printed and the command fails.

use clap::Args;
use insidertrack_core::errors::io_error;
use insidertrack_core::{ChangeReport, Snapshot};
use insidertrack_engine::CommitOutcome;
use std::path::PathBuf;

use super::{open_coordinator, parse_key};
use crate::config::CliConfig;

#[derive(Debug, Args)]
pub struct CommitArgs {
    /// Entity key (company slug)
    #[arg(long)]
    pub key: String,

    /// Snapshot document produced by the fetcher
    #[arg(long)]
    pub input: PathBuf,

    /// Print the full change report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: CommitArgs, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let key = parse_key(&args.key)?;
    let bytes = std::fs::read(&args.input).map_err(|e| io_error("read_input", e))?;
    let snapshot = Snapshot::from_json_slice(&bytes)?;

    let coordinator = open_coordinator(config)?;
    let (report, pending) = match coordinator.commit(&key, &snapshot)? {
        CommitOutcome::Complete(report) => (report, None),
        CommitOutcome::Partial { report, error } => {
            eprintln!("Warning: {}; resuming", error);
            match coordinator.resume_commit(&key, &snapshot, &report) {
                Ok(()) => (report, None),
                Err(resume_error) => {
                    eprintln!("Warning: resume failed: {}", resume_error);
                    (report, Some(error))
                }
            }
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(key.as_str(), &report);
    }
    match pending {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

pub fn print_report(key: &str, report: &ChangeReport) {
    println!("{}: {}", key, report.summary_line());
    for txn in &report.new_transactions {
        println!(
            "  + {} {} {} {} shares, {}",
            txn.transaction_date, txn.insider_name, txn.transaction_type, txn.number_of_shares, txn.value
        );
    }
    for txn in &report.removed_transactions {
        println!(
            "  - {} {} {} {} shares, {}",
            txn.transaction_date, txn.insider_name, txn.transaction_type, txn.number_of_shares, txn.value
        );
    }
}
