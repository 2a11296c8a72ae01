//! Persisted file naming
//!
//! The coordination service names every snapshot and transaction log
//! `prefix.hexZxid`, e.g. `snapshot.a3f` or `log.1b2`. The zxid in a log's
//! name is the first transaction it contains; the zxid in a snapshot's name
//! is the last transaction applied before it was taken.
//!
//! Archived files keep their names verbatim, so this codec must stay
//! bit-compatible with the service: same prefixes, same `.` separator,
//! lowercase hex with no padding.

use crate::error::{NameError, NameResult};
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

/// Transaction id assigned by the coordination service
pub type Zxid = u64;

/// Prefix of snapshot file names
pub const SNAPSHOT_PREFIX: &str = "snapshot";

/// Prefix of transaction log file names
pub const LOG_PREFIX: &str = "log";

/// Separator between prefix and hex zxid
pub const SEPARATOR: char = '.';

/// Parse the zxid out of `name`, which must look like `prefix.hexZxid`
pub fn parse_zxid(name: &str, prefix: &str) -> NameResult<Zxid> {
    let suffix = name
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix(SEPARATOR))
        .ok_or_else(|| NameError::WrongPrefix {
            name: name.to_string(),
            prefix: prefix.to_string(),
        })?;

    if suffix.is_empty() {
        return Err(NameError::MissingZxid {
            name: name.to_string(),
        });
    }

    // from_str_radix tolerates a leading '+', the service's names never have one
    let invalid = || NameError::InvalidHex {
        name: name.to_string(),
        suffix: suffix.to_string(),
    };
    if !suffix.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    Zxid::from_str_radix(suffix, 16).map_err(|_| invalid())
}

/// Build the file name the service would use for `zxid`
pub fn file_name_for(prefix: &str, zxid: Zxid) -> String {
    format!("{}{}{:x}", prefix, SEPARATOR, zxid)
}

/// Kind of persisted file, determined by its name prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileKind {
    /// Point-in-time dump of the service's state
    Snapshot,
    /// Append-only transaction log
    Log,
}

impl FileKind {
    /// Name prefix for this kind
    pub fn prefix(&self) -> &'static str {
        match self {
            FileKind::Snapshot => SNAPSHOT_PREFIX,
            FileKind::Log => LOG_PREFIX,
        }
    }

    /// Kind whose `prefix.` the name starts with
    ///
    /// Only the prefix is checked; the zxid suffix may still be malformed.
    pub fn classify(name: &str) -> Option<FileKind> {
        [FileKind::Snapshot, FileKind::Log].into_iter().find(|kind| {
            name.strip_prefix(kind.prefix())
                .map_or(false, |rest| rest.starts_with(SEPARATOR))
        })
    }

    /// Parse `name` as a file of this kind
    pub fn parse(&self, name: &str) -> NameResult<Zxid> {
        parse_zxid(name, self.prefix())
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Snapshot => write!(f, "snap"),
            FileKind::Log => write!(f, "txn"),
        }
    }
}

/// A snapshot or log file on disk
///
/// Never modified by this tool, only read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersistedFile {
    path: PathBuf,
    kind: FileKind,
    zxid: Zxid,
}

impl PersistedFile {
    /// Identify the file at `path` as a persisted file of `kind`
    pub fn from_path(path: impl Into<PathBuf>, kind: FileKind) -> NameResult<Self> {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let zxid = kind.parse(&name)?;
        Ok(PersistedFile { path, kind, zxid })
    }

    /// Full path on disk
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot or log
    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Zxid embedded in the name
    pub fn zxid(&self) -> Zxid {
        self.zxid
    }

    /// Base file name, the name the file keeps inside an archive
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name_for(self.kind.prefix(), self.zxid))
    }
}

impl Ord for PersistedFile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then(self.zxid.cmp(&other.zxid))
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl PartialOrd for PersistedFile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
