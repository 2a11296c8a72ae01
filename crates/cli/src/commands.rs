//! Clap command definition.

use clap::{Arg, ArgAction, Command};

/// Build the CLI.
pub fn build_cli() -> Command {
    Command::new("zkarchive")
        .about("Archive the most recent snapshots and their transaction logs into one tarball")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to zoo.cfg; supplies dataDir and dataLogDir"),
        )
        .arg(
            Arg::new("snap-dir")
                .long("snap-dir")
                .value_name("DIR")
                .help("Snapshot directory (overrides dataDir)"),
        )
        .arg(
            Arg::new("txn-dir")
                .long("txn-dir")
                .value_name("DIR")
                .help("Transaction-log directory (overrides dataLogDir)"),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .value_name("DIR")
                .help("Directory the archive is written to (default: ./)"),
        )
        .arg(
            Arg::new("snap-count")
                .long("snap-count")
                .value_name("N")
                .help("Number of most recent snapshots to keep (default: 1)")
                .value_parser(clap::value_parser!(i64))
                .allow_negative_numbers(true),
        )
        .arg(
            Arg::new("compression")
                .long("compression")
                .value_name("CODEC")
                .help("gzip (data.tar.gz, default) or zstd (data.tar.zst)")
                .value_parser(["gzip", "zstd"]),
        )
        .arg(
            Arg::new("skip-malformed")
                .long("skip-malformed")
                .help("Skip files with a known prefix but a bad zxid instead of failing")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the result as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("FILTER")
                .help("Log filter used when RUST_LOG is unset (default: info)")
                .default_value("info"),
        )
}
