//! One backup run
//!
//! validate config -> open store -> select snapshots -> select logs ->
//! write archive. Strictly sequential; nothing is retried, the scheduler
//! that invokes the tool owns retry policy.

use crate::archive::{ArchiveError, ArchiveInfo, ArchiveWriter};
use crate::config::{BackupConfig, ConfigError};
use crate::selection::{select_logs_for, select_recent_snapshots};
use crate::store::{PersistedStateStore, StoreError};
use thiserror::Error;
use tracing::{info, warn};

/// How a successful run ended
#[derive(Debug, Clone)]
pub enum BackupOutcome {
    /// Archive written
    Archived(ArchiveInfo),
    /// No snapshots and no logs; no archive was written
    NothingToArchive,
}

/// Errors that abort a backup run
#[derive(Debug, Error)]
pub enum BackupError {
    /// Configuration rejected before any file was touched
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Persisted-state directories could not be scanned
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Archive could not be written
    #[error("Failed to write archive: {0}")]
    Archive(#[from] ArchiveError),
}

/// Run a backup with `config`
pub fn run_backup(config: &BackupConfig) -> Result<BackupOutcome, BackupError> {
    config.validate()?;
    info!(
        target: "zkarchive::backup",
        snap_dir = %config.snap_dir.display(),
        txn_dir = %config.txn_dir.display(),
        snapshot_count = config.snapshot_count,
        output_dir = %config.output_dir.display(),
        compression = %config.archive.compression,
        "Starting backup"
    );

    let store = PersistedStateStore::open(&config.snap_dir, &config.txn_dir, config.malformed_names)?;
    let snapshots = select_recent_snapshots(&store, config.retained_snapshots())?;
    let logs = match select_logs_for(&store, &snapshots)? {
        Some(logs) => logs,
        None => {
            info!(target: "zkarchive::backup", "no txn file found, skip compress");
            return Ok(BackupOutcome::NothingToArchive);
        }
    };

    if logs.is_empty() {
        warn!(
            target: "zkarchive::backup",
            "No logs cover the selected snapshots; archive will hold snapshots only"
        );
    }
    info!(
        target: "zkarchive::backup",
        "select snap cnt:{}, txn cnt: {}",
        snapshots.len(),
        logs.len()
    );

    let writer = ArchiveWriter::new(&config.archive);
    let info = writer.write(&snapshots, &logs, &config.output_dir)?;
    Ok(BackupOutcome::Archived(info))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_count_rejected_before_io() {
        let config = BackupConfig::new("/nonexistent/data", "/nonexistent/log")
            .with_snapshot_count(0);
        let result = run_backup(&config);
        assert!(matches!(
            result,
            Err(BackupError::Config(ConfigError::InvalidSnapshotCount(0)))
        ));
    }

    #[test]
    fn test_missing_directory_reported() {
        let config = BackupConfig::new("/nonexistent/data", "/nonexistent/log");
        let result = run_backup(&config);
        assert!(matches!(
            result,
            Err(BackupError::Store(StoreError::MissingDirectory { .. }))
        ));
    }
}
