//! Snapshot and log selection
//!
//! Picks the files a backup needs: the N most recent snapshots plus every
//! log required to replay forward from the oldest of them. A snapshot on its
//! own cannot restore a server, so logs always travel with it.

use crate::store::{PersistedState, StoreResult};
use tracing::{debug, info};
use zkarchive_core::PersistedFile;

/// Files chosen for one backup run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Snapshots, most recent first
    pub snapshots: Vec<PersistedFile>,
    /// Logs, ascending by start zxid
    pub logs: Vec<PersistedFile>,
}

impl Selection {
    /// Total number of files
    pub fn len(&self) -> usize {
        self.snapshots.len() + self.logs.len()
    }

    /// True when nothing was selected
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Up to `count` snapshots, highest zxid first
///
/// Fewer than `count` available is not an error; a young deployment may
/// have none at all.
pub fn select_recent_snapshots<S: PersistedState + ?Sized>(
    store: &S,
    count: usize,
) -> StoreResult<Vec<PersistedFile>> {
    let snapshots = store.find_recent_snapshots(count)?;
    debug!(
        target: "zkarchive::select",
        requested = count,
        found = snapshots.len(),
        "Selected snapshots"
    );
    Ok(snapshots)
}

/// Logs needed alongside `snapshots`
///
/// With snapshots, returns the logs covering everything after the oldest
/// one. Without snapshots, returns every log file, or `None` when there are
/// no logs either and there is nothing worth archiving.
pub fn select_logs_for<S: PersistedState + ?Sized>(
    store: &S,
    snapshots: &[PersistedFile],
) -> StoreResult<Option<Vec<PersistedFile>>> {
    match snapshots.last() {
        Some(oldest) => {
            let logs = store.find_companion_logs(oldest.zxid())?;
            debug!(
                target: "zkarchive::select",
                floor = oldest.zxid(),
                found = logs.len(),
                "Selected companion logs"
            );
            Ok(Some(logs))
        }
        None => {
            let logs = store.list_log_files()?;
            if logs.is_empty() {
                return Ok(None);
            }
            info!(
                target: "zkarchive::select",
                found = logs.len(),
                "No snapshots present, selecting every log"
            );
            Ok(Some(logs))
        }
    }
}

/// Run both selectors; `None` means there is nothing to archive
pub fn select<S: PersistedState + ?Sized>(
    store: &S,
    count: usize,
) -> StoreResult<Option<Selection>> {
    let snapshots = select_recent_snapshots(store, count)?;
    Ok(select_logs_for(store, &snapshots)?.map(|logs| Selection { snapshots, logs }))
}
