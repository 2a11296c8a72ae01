//! Persisted-state directory structure
//!
//! The coordination service keeps snapshots and transaction logs under a
//! versioned subdirectory of each configured directory:
//!
//! ```text
//! dataDir/
//! ├── myid
//! └── version-2/
//!     ├── snapshot.100000000
//!     ├── snapshot.1000003e8
//!     ├── acceptedEpoch
//!     └── currentEpoch
//! dataLogDir/
//! └── version-2/
//!     ├── log.100000001
//!     └── log.1000003e9
//! ```
//!
//! `dataDir` and `dataLogDir` may be the same directory.

use super::error::{StoreError, StoreResult};
use std::path::{Path, PathBuf};

/// Name of the versioned subdirectory holding persisted files
pub const VERSION_DIR: &str = "version-2";

/// Resolved snapshot and transaction-log directories
#[derive(Debug, Clone)]
pub struct StorePaths {
    snap_dir: PathBuf,
    txn_dir: PathBuf,
}

impl StorePaths {
    /// Resolve configured directories to the ones holding persisted files
    ///
    /// A directory with a `version-2` child resolves to that child, anything
    /// else is used as given.
    pub fn resolve(snap_dir: impl AsRef<Path>, txn_dir: impl AsRef<Path>) -> Self {
        StorePaths {
            snap_dir: versioned(snap_dir.as_ref()),
            txn_dir: versioned(txn_dir.as_ref()),
        }
    }

    /// Directory scanned for snapshots
    pub fn snap_dir(&self) -> &Path {
        &self.snap_dir
    }

    /// Directory scanned for transaction logs
    pub fn txn_dir(&self) -> &Path {
        &self.txn_dir
    }

    /// Check that both directories exist
    ///
    /// Nothing is created: a missing directory means the configuration
    /// points at the wrong place.
    pub fn validate(&self) -> StoreResult<()> {
        for dir in [&self.snap_dir, &self.txn_dir] {
            if !dir.exists() {
                return Err(StoreError::MissingDirectory { path: dir.clone() });
            }
            if !dir.is_dir() {
                return Err(StoreError::NotADirectory { path: dir.clone() });
            }
        }
        Ok(())
    }
}

fn versioned(dir: &Path) -> PathBuf {
    let candidate = dir.join(VERSION_DIR);
    if candidate.is_dir() {
        candidate
    } else {
        dir.to_path_buf()
    }
}
