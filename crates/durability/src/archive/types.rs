//! Archive options and results

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Archive file name for gzip output
pub const GZIP_ARCHIVE_NAME: &str = "data.tar.gz";

/// Archive file name for zstd output
pub const ZSTD_ARCHIVE_NAME: &str = "data.tar.zst";

/// Compression applied to the tar stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// gzip, readable by `tar xzf`
    Gzip {
        /// Level 0-9
        level: u32,
    },
    /// zstd
    Zstd {
        /// Level 1-22
        level: i32,
    },
}

impl Compression {
    /// gzip at the default level
    pub fn gzip() -> Self {
        Compression::Gzip { level: 6 }
    }

    /// zstd at the default level
    pub fn zstd() -> Self {
        Compression::Zstd { level: 3 }
    }

    /// Fixed output file name for this codec
    pub fn archive_name(&self) -> &'static str {
        match self {
            Compression::Gzip { .. } => GZIP_ARCHIVE_NAME,
            Compression::Zstd { .. } => ZSTD_ARCHIVE_NAME,
        }
    }
}

impl Default for Compression {
    fn default() -> Self {
        Compression::gzip()
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compression::Gzip { level } => write!(f, "gzip (level {})", level),
            Compression::Zstd { level } => write!(f, "zstd (level {})", level),
        }
    }
}

impl FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gzip" | "gz" => Ok(Compression::gzip()),
            "zstd" | "zst" => Ok(Compression::zstd()),
            other => Err(format!(
                "unknown compression '{}', expected gzip or zstd",
                other
            )),
        }
    }
}

/// Options for writing an archive
#[derive(Debug, Clone, Default)]
pub struct ArchiveOptions {
    /// Codec for the tar stream (default: gzip)
    pub compression: Compression,
}

impl ArchiveOptions {
    /// Set compression (builder pattern)
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }
}

/// Information returned after writing an archive
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveInfo {
    /// Path of the finished archive
    pub path: PathBuf,

    /// Number of entries written
    pub entry_count: usize,

    /// Number of snapshot entries
    pub snapshot_count: usize,

    /// Number of log entries
    pub log_count: usize,

    /// Sum of source file sizes
    pub uncompressed_bytes: u64,

    /// Size of the archive file in bytes
    pub archive_size_bytes: u64,
}
