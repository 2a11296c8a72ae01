//! Store error types

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use zkarchive_core::NameError;

/// Errors raised while scanning persisted-state directories
#[derive(Debug, Error)]
pub enum StoreError {
    /// Configured directory does not exist
    #[error("Directory not found: {path}")]
    MissingDirectory {
        /// Directory that was checked
        path: PathBuf,
    },

    /// Configured path exists but is not a directory
    #[error("Not a directory: {path}")]
    NotADirectory {
        /// Path that was checked
        path: PathBuf,
    },

    /// A file carries a known prefix but an unparseable zxid
    #[error("Malformed file name in {dir}: {source}")]
    MalformedName {
        /// Directory the file was found in
        dir: PathBuf,
        /// What is wrong with the name
        #[source]
        source: NameError,
    },

    /// Directory could not be listed
    #[error("IO error reading {path}: {source}")]
    Io {
        /// Directory being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// Create an IO error for `path`
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
