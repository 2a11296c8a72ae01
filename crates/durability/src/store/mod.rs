//! Persisted-state store
//!
//! Read-only view over the directories where the coordination service keeps
//! its snapshots and transaction logs. Files are identified purely by name;
//! their contents are never opened here.
//!
//! Selection follows the service's own recovery bookkeeping:
//! - the N most recent snapshots are the N highest snapshot zxids
//! - the logs needed to replay from a snapshot at zxid Z are the log whose
//!   start zxid is the greatest one <= Z, plus every log starting after it

mod error;
mod paths;

pub use error::{StoreError, StoreResult};
pub use paths::{StorePaths, VERSION_DIR};

use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use zkarchive_core::{FileKind, PersistedFile, Zxid};

/// What to do with a file that has a known prefix but a bad zxid suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedNamePolicy {
    /// Fail the scan; the operator has to look at the directory
    #[default]
    Abort,
    /// Leave the file out and log a warning
    Skip,
}

/// Source of snapshot and log files
///
/// `PersistedStateStore` reads them from disk; tests can substitute a fixed
/// listing.
pub trait PersistedState {
    /// Up to `n` snapshots, highest zxid first
    fn find_recent_snapshots(&self, n: usize) -> StoreResult<Vec<PersistedFile>>;

    /// Logs needed to replay from a snapshot taken at `floor`, ascending
    fn find_companion_logs(&self, floor: Zxid) -> StoreResult<Vec<PersistedFile>>;

    /// Every log file, ascending
    fn list_log_files(&self) -> StoreResult<Vec<PersistedFile>>;
}

/// On-disk persisted state of one server
#[derive(Debug, Clone)]
pub struct PersistedStateStore {
    paths: StorePaths,
    policy: MalformedNamePolicy,
}

impl PersistedStateStore {
    /// Open the store over the configured snapshot and log directories
    pub fn open(
        snap_dir: impl AsRef<Path>,
        txn_dir: impl AsRef<Path>,
        policy: MalformedNamePolicy,
    ) -> StoreResult<Self> {
        let paths = StorePaths::resolve(snap_dir, txn_dir);
        paths.validate()?;
        debug!(
            target: "zkarchive::store",
            snap_dir = %paths.snap_dir().display(),
            txn_dir = %paths.txn_dir().display(),
            "Opened persisted state"
        );
        Ok(PersistedStateStore { paths, policy })
    }

    /// Resolved directories
    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    fn scan(&self, dir: &Path, kind: FileKind) -> StoreResult<Vec<PersistedFile>> {
        let mut files = Vec::new();

        for entry in fs::read_dir(dir).map_err(|e| StoreError::io(dir, e))? {
            let entry = entry.map_err(|e| StoreError::io(dir, e))?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();

            if FileKind::classify(&name) != Some(kind) {
                debug!(target: "zkarchive::store", file = %name, "Ignoring unrelated file");
                continue;
            }
            if !path.is_file() {
                debug!(target: "zkarchive::store", file = %name, "Ignoring non-regular file");
                continue;
            }

            match PersistedFile::from_path(path, kind) {
                Ok(file) => files.push(file),
                Err(e) => match self.policy {
                    MalformedNamePolicy::Abort => {
                        return Err(StoreError::MalformedName {
                            dir: dir.to_path_buf(),
                            source: e,
                        })
                    }
                    MalformedNamePolicy::Skip => {
                        warn!(target: "zkarchive::store", file = %name, error = %e, "Skipping malformed file name");
                    }
                },
            }
        }

        files.sort();
        Ok(files)
    }
}

impl PersistedState for PersistedStateStore {
    fn find_recent_snapshots(&self, n: usize) -> StoreResult<Vec<PersistedFile>> {
        let mut snapshots = self.scan(self.paths.snap_dir(), FileKind::Snapshot)?;
        snapshots.reverse();
        snapshots.truncate(n);
        Ok(snapshots)
    }

    fn find_companion_logs(&self, floor: Zxid) -> StoreResult<Vec<PersistedFile>> {
        let logs = self.list_log_files()?;
        Ok(companion_logs(logs, floor))
    }

    fn list_log_files(&self) -> StoreResult<Vec<PersistedFile>> {
        self.scan(self.paths.txn_dir(), FileKind::Log)
    }
}

/// Logs covering every transaction after `floor`, from an ascending listing
///
/// The log that starts at or before `floor` may hold transactions after it,
/// so it is kept along with everything newer. With no such log the whole
/// listing is kept.
pub fn companion_logs(logs: Vec<PersistedFile>, floor: Zxid) -> Vec<PersistedFile> {
    let start = logs
        .iter()
        .map(PersistedFile::zxid)
        .filter(|&zxid| zxid <= floor)
        .max()
        .unwrap_or(0);

    logs.into_iter().filter(|log| log.zxid() >= start).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use zkarchive_core::{file_name_for, LOG_PREFIX, SNAPSHOT_PREFIX};

    fn log(zxid: Zxid) -> PersistedFile {
        PersistedFile::from_path(file_name_for(LOG_PREFIX, zxid), FileKind::Log).unwrap()
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), name.as_bytes()).unwrap();
    }

    fn zxids(files: &[PersistedFile]) -> Vec<Zxid> {
        files.iter().map(|f| f.zxid()).collect()
    }

    #[test]
    fn test_companion_logs_floor_between_logs() {
        let logs = vec![log(1), log(5), log(9), log(12)];
        assert_eq!(zxids(&companion_logs(logs, 7)), vec![5, 9, 12]);
    }

    #[test]
    fn test_companion_logs_floor_equals_log_start() {
        let logs = vec![log(1), log(5), log(9)];
        assert_eq!(zxids(&companion_logs(logs, 5)), vec![5, 9]);
    }

    #[test]
    fn test_companion_logs_floor_before_all_logs() {
        let logs = vec![log(5), log(9)];
        assert_eq!(zxids(&companion_logs(logs, 2)), vec![5, 9]);
    }

    #[test]
    fn test_companion_logs_floor_after_all_logs() {
        let logs = vec![log(1), log(5)];
        assert_eq!(zxids(&companion_logs(logs, 100)), vec![5]);
    }

    #[test]
    fn test_companion_logs_empty() {
        assert!(companion_logs(Vec::new(), 10).is_empty());
    }

    #[test]
    fn test_open_missing_directory() {
        let result = PersistedStateStore::open(
            "/nonexistent/snap",
            "/nonexistent/txn",
            MalformedNamePolicy::Abort,
        );
        assert!(matches!(result, Err(StoreError::MissingDirectory { .. })));
    }

    #[test]
    fn test_scan_ignores_unrelated_files() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "snapshot.10");
        touch(dir.path(), "log.f");
        touch(dir.path(), "currentEpoch");
        touch(dir.path(), "acceptedEpoch");
        fs::create_dir(dir.path().join("snapshot.20")).unwrap();

        let store =
            PersistedStateStore::open(dir.path(), dir.path(), MalformedNamePolicy::Abort).unwrap();

        assert_eq!(zxids(&store.find_recent_snapshots(10).unwrap()), vec![0x10]);
        assert_eq!(zxids(&store.list_log_files().unwrap()), vec![0xf]);
    }

    #[test]
    fn test_scan_aborts_on_malformed_name() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "snapshot.10");
        touch(dir.path(), "snapshot.10.tmp");

        let store =
            PersistedStateStore::open(dir.path(), dir.path(), MalformedNamePolicy::Abort).unwrap();

        let result = store.find_recent_snapshots(1);
        assert!(matches!(result, Err(StoreError::MalformedName { .. })));
    }

    #[test]
    fn test_scan_skips_malformed_name() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "snapshot.10");
        touch(dir.path(), "snapshot.zz");

        let store =
            PersistedStateStore::open(dir.path(), dir.path(), MalformedNamePolicy::Skip).unwrap();

        assert_eq!(zxids(&store.find_recent_snapshots(5).unwrap()), vec![0x10]);
    }

    #[test]
    fn test_recent_snapshots_descending() {
        let dir = tempdir().unwrap();
        for zxid in [5u64, 8, 10, 0x1a, 3] {
            touch(dir.path(), &file_name_for(SNAPSHOT_PREFIX, zxid));
        }

        let store =
            PersistedStateStore::open(dir.path(), dir.path(), MalformedNamePolicy::Abort).unwrap();

        assert_eq!(
            zxids(&store.find_recent_snapshots(3).unwrap()),
            vec![0x1a, 10, 8]
        );
    }

    #[test]
    fn test_store_uses_version_dir() {
        let dir = tempdir().unwrap();
        let version_dir = dir.path().join(VERSION_DIR);
        fs::create_dir(&version_dir).unwrap();
        touch(&version_dir, "snapshot.4");
        touch(&version_dir, "log.1");
        touch(dir.path(), "myid");

        let store =
            PersistedStateStore::open(dir.path(), dir.path(), MalformedNamePolicy::Abort).unwrap();

        assert_eq!(store.paths().snap_dir(), version_dir);
        assert_eq!(zxids(&store.find_recent_snapshots(1).unwrap()), vec![4]);
        assert_eq!(zxids(&store.find_companion_logs(4).unwrap()), vec![1]);
    }
}
