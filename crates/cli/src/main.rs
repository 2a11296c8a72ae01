//! zkarchive CLI — back up a coordination service's persisted state.
//!
//! `zkarchive [--config zoo.cfg] [--snap-dir DIR] [--txn-dir DIR] ...`
//!
//! Keeps the N most recent snapshots plus the transaction logs needed to
//! replay from the oldest of them, bundled into `data.tar.gz`. Exits 0 when
//! the archive is written or when there is nothing to archive, 1 on error.

mod commands;
mod format;
mod resolve;

use std::process;

use anyhow::Context;
use clap::ArgMatches;
use tracing_subscriber::EnvFilter;
use zkarchive_durability::run_backup;

use commands::build_cli;
use format::{format_error, format_outcome, OutputMode};
use resolve::{resolve, Overrides};

fn main() {
    let matches = build_cli().get_matches();
    init_logging(&matches);

    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match run(&matches, output_mode) {
        Ok(formatted) => println!("{}", formatted),
        Err(e) => {
            eprintln!("{}", format_error(&format!("{:#}", e), output_mode));
            process::exit(1);
        }
    }
}

fn init_logging(matches: &ArgMatches) {
    let level = matches
        .get_one::<String>("log-level")
        .map(String::as_str)
        .unwrap_or("info");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn run(matches: &ArgMatches, mode: OutputMode) -> anyhow::Result<String> {
    let overrides = Overrides::from_matches(matches)?;
    let config = resolve(&overrides).context("failed to resolve configuration")?;
    let outcome = run_backup(&config).context("backup failed")?;
    Ok(format_outcome(&outcome, mode))
}
