//! zkarchive - backup archiver for a coordination service's persisted state
//!
//! Picks the N most recent snapshots from the service's data directory and
//! the transaction logs needed to replay forward from the oldest of them,
//! then bundles them into a single compressed tar file.
//!
//! # Quick Start
//!
//! ```ignore
//! use zkarchive::{run_backup, BackupConfig, BackupOutcome};
//!
//! let config = BackupConfig::new("/var/lib/zookeeper", "/var/lib/zookeeper")
//!     .with_snapshot_count(2)
//!     .with_output_dir("/backups");
//!
//! match run_backup(&config)? {
//!     BackupOutcome::Archived(info) => println!("wrote {}", info.path.display()),
//!     BackupOutcome::NothingToArchive => println!("nothing to back up"),
//! }
//! ```

pub use zkarchive_core::*;
pub use zkarchive_durability::*;
