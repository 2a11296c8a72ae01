//! Backup archive writer
//!
//! Bundles the selected snapshots and logs into one compressed tar file:
//!
//! ```text
//! data.tar.gz
//! ├── snapshot.1000003e8   — snapshots, most recent first
//! ├── snapshot.100000000
//! ├── log.100000001        — logs, ascending start zxid
//! └── log.1000003e9
//! ```
//!
//! Entry names are the source base names, unchanged, so restore tooling can
//! keep relying on the `prefix.hexZxid` convention.

pub mod error;
pub mod types;
pub mod writer;

pub use error::{ArchiveError, ArchiveResult};
pub use types::{ArchiveInfo, ArchiveOptions, Compression, GZIP_ARCHIVE_NAME, ZSTD_ARCHIVE_NAME};
pub use writer::ArchiveWriter;
