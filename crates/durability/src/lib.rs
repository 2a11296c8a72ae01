//! Persisted-state backup for zkarchive
//!
//! This crate handles everything that touches disk:
//!
//! - Store: read-only scanning of the snapshot and log directories
//! - Selection: N most recent snapshots plus the logs to replay from them
//! - Archive: streaming the selection into one compressed tar file
//! - Config: the immutable settings for one run
//! - Backup: the end-to-end run

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod archive; // Compressed tar writer
pub mod backup; // End-to-end run
pub mod config; // BackupConfig and validation
pub mod selection; // Snapshot and log selectors
pub mod store; // Directory scanning

pub use archive::{
    ArchiveError, ArchiveInfo, ArchiveOptions, ArchiveResult, ArchiveWriter, Compression,
    GZIP_ARCHIVE_NAME, ZSTD_ARCHIVE_NAME,
};
pub use backup::{run_backup, BackupError, BackupOutcome};
pub use config::{BackupConfig, ConfigError, DEFAULT_OUTPUT_DIR, DEFAULT_SNAPSHOT_COUNT};
pub use selection::{select, select_logs_for, select_recent_snapshots, Selection};
pub use store::{
    companion_logs, MalformedNamePolicy, PersistedState, PersistedStateStore, StoreError,
    StorePaths, StoreResult, VERSION_DIR,
};
