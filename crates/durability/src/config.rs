//! Backup configuration
//!
//! One immutable `BackupConfig` is built at startup and handed to every
//! stage of the run by reference.

use crate::archive::{ArchiveOptions, Compression};
use crate::store::MalformedNamePolicy;
use std::path::PathBuf;

/// Number of snapshots kept when none is configured
pub const DEFAULT_SNAPSHOT_COUNT: i64 = 1;

/// Directory the archive lands in when none is configured
pub const DEFAULT_OUTPUT_DIR: &str = "./";

/// Backup configuration
#[derive(Debug, Clone)]
pub struct BackupConfig {
    /// Snapshot directory (the service's `dataDir`)
    pub snap_dir: PathBuf,
    /// Transaction-log directory (the service's `dataLogDir`)
    pub txn_dir: PathBuf,
    /// Number of most recent snapshots to keep (default: 1)
    pub snapshot_count: i64,
    /// Directory the archive is written to (default: `./`)
    pub output_dir: PathBuf,
    /// Archive options
    pub archive: ArchiveOptions,
    /// Handling of files with a known prefix but a bad zxid
    pub malformed_names: MalformedNamePolicy,
}

impl Default for BackupConfig {
    fn default() -> Self {
        BackupConfig {
            snap_dir: PathBuf::new(),
            txn_dir: PathBuf::new(),
            snapshot_count: DEFAULT_SNAPSHOT_COUNT,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            archive: ArchiveOptions::default(),
            malformed_names: MalformedNamePolicy::default(),
        }
    }
}

impl BackupConfig {
    /// Create config for the given snapshot and log directories
    pub fn new(snap_dir: impl Into<PathBuf>, txn_dir: impl Into<PathBuf>) -> Self {
        BackupConfig {
            snap_dir: snap_dir.into(),
            txn_dir: txn_dir.into(),
            ..Default::default()
        }
    }

    /// Set snapshot directory
    pub fn with_snap_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snap_dir = dir.into();
        self
    }

    /// Set transaction-log directory
    pub fn with_txn_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.txn_dir = dir.into();
        self
    }

    /// Set number of snapshots to keep
    pub fn with_snapshot_count(mut self, count: i64) -> Self {
        self.snapshot_count = count;
        self
    }

    /// Set output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set archive compression
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.archive.compression = compression;
        self
    }

    /// Set malformed-name policy
    pub fn with_malformed_names(mut self, policy: MalformedNamePolicy) -> Self {
        self.malformed_names = policy;
        self
    }

    /// Snapshot count as a selector argument
    ///
    /// Only meaningful after `validate` has passed.
    pub fn retained_snapshots(&self) -> usize {
        usize::try_from(self.snapshot_count.max(1)).unwrap_or(usize::MAX)
    }

    /// Validate configuration
    ///
    /// Checks values only; the directories themselves are looked at when
    /// the store is opened.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.snap_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptySnapDir);
        }
        if self.txn_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyTxnDir);
        }
        if self.snapshot_count < 1 {
            return Err(ConfigError::InvalidSnapshotCount(self.snapshot_count));
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Snapshot directory is empty
    #[error("snapDir cannot be empty")]
    EmptySnapDir,

    /// Transaction-log directory is empty
    #[error("txnDir cannot be empty")]
    EmptyTxnDir,

    /// Snapshot count below one
    #[error("snapshot count should be greater than or equal to 1, got {0}")]
    InvalidSnapshotCount(i64),
}
