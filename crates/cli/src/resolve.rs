//! Configuration resolution.
//!
//! Builds the `BackupConfig` for a run from an optional `zoo.cfg` plus
//! command-line overrides. Flags win over the file; empty values never
//! override anything.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ArgMatches;
use zkarchive_durability::{BackupConfig, Compression, MalformedNamePolicy};

/// zoo.cfg key naming the snapshot directory.
pub const SNAPSHOT_DIR_KEY: &str = "dataDir";

/// zoo.cfg key naming the transaction-log directory.
pub const TXN_DIR_KEY: &str = "dataLogDir";

/// Errors resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Config file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Flag value could not be interpreted.
    #[error("invalid value for --{flag}: {reason}")]
    InvalidFlag { flag: &'static str, reason: String },
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub snap_dir: Option<String>,
    pub txn_dir: Option<String>,
    pub output_dir: Option<String>,
    pub snapshot_count: Option<i64>,
    pub compression: Option<Compression>,
    pub skip_malformed: bool,
}

impl Overrides {
    /// Collect overrides from parsed arguments.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, ResolveError> {
        let string = |id: &str| {
            matches
                .get_one::<String>(id)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let compression = string("compression")
            .map(|s| {
                s.parse::<Compression>()
                    .map_err(|reason| ResolveError::InvalidFlag {
                        flag: "compression",
                        reason,
                    })
            })
            .transpose()?;

        Ok(Overrides {
            config_path: string("config").map(PathBuf::from),
            snap_dir: string("snap-dir"),
            txn_dir: string("txn-dir"),
            output_dir: string("output-dir"),
            snapshot_count: matches.get_one::<i64>("snap-count").copied(),
            compression,
            skip_malformed: matches.get_flag("skip-malformed"),
        })
    }
}

/// Directories read from zoo.cfg.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZooCfg {
    pub data_dir: Option<String>,
    pub data_log_dir: Option<String>,
}

impl ZooCfg {
    /// Read and parse a zoo.cfg file.
    pub fn load(path: &Path) -> Result<Self, ResolveError> {
        let text = fs::read_to_string(path).map_err(|source| ResolveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Pick the directory keys out of properties text.
    pub fn parse(text: &str) -> Self {
        let mut cfg = ZooCfg::default();
        for (key, value) in parse_properties(text) {
            if key == SNAPSHOT_DIR_KEY {
                cfg.data_dir = Some(value);
            } else if key == TXN_DIR_KEY {
                cfg.data_log_dir = Some(value);
            }
        }
        cfg
    }
}

/// Build the run configuration. The result is not yet validated.
pub fn resolve(overrides: &Overrides) -> Result<BackupConfig, ResolveError> {
    let file = match &overrides.config_path {
        Some(path) => ZooCfg::load(path)?,
        None => ZooCfg::default(),
    };

    let snap_dir = overrides.snap_dir.clone().or(file.data_dir).unwrap_or_default();
    let txn_dir = overrides.txn_dir.clone().or(file.data_log_dir).unwrap_or_default();

    let mut config = BackupConfig::new(snap_dir, txn_dir);
    if let Some(dir) = &overrides.output_dir {
        config = config.with_output_dir(dir);
    }
    if let Some(count) = overrides.snapshot_count {
        config = config.with_snapshot_count(count);
    }
    if let Some(compression) = overrides.compression {
        config = config.with_compression(compression);
    }
    if overrides.skip_malformed {
        config = config.with_malformed_names(MalformedNamePolicy::Skip);
    }
    Ok(config)
}

/// Parse Java-properties text into key/value pairs, in file order.
///
/// Supports `#`/`!` comments, `=`, `:` or whitespace separators and
/// backslash line continuation. Escape sequences are not interpreted.
pub fn parse_properties(text: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut logical = String::new();

    for raw in text.lines() {
        let line = raw.trim_start();
        if logical.is_empty() && (line.is_empty() || line.starts_with('#') || line.starts_with('!'))
        {
            continue;
        }

        let trailing = line.len() - line.trim_end_matches('\\').len();
        if trailing % 2 == 1 {
            logical.push_str(&line[..line.len() - 1]);
            continue;
        }

        logical.push_str(line);
        if let Some(pair) = split_pair(&logical) {
            pairs.push(pair);
        }
        logical.clear();
    }

    if let Some(pair) = split_pair(&logical) {
        pairs.push(pair);
    }
    pairs
}

fn split_pair(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let end = line
        .find(|c: char| c == '=' || c == ':' || c.is_whitespace())
        .unwrap_or(line.len());
    let (key, rest) = line.split_at(end);
    let rest = rest.trim_start();
    let value = rest
        .strip_prefix(|c: char| c == '=' || c == ':')
        .unwrap_or(rest);
    Some((key.to_string(), value.trim().to_string()))
}
