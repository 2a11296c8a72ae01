//! Archive error types

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing an archive
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// A selected file could not be opened or read
    #[error("Cannot read {path}: {source}")]
    SourceUnreadable {
        /// File being archived
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Tar layer failed
    #[error("Archive error: {0}")]
    Archive(String),

    /// Compression layer failed
    #[error("Compression error: {0}")]
    Compression(String),

    /// IO error on the output file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ArchiveError {
    /// Create an archive error
    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    /// Create a compression error
    pub fn compression(msg: impl Into<String>) -> Self {
        Self::Compression(msg.into())
    }

    /// Create an error for an unreadable source file
    pub fn source_unreadable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::SourceUnreadable {
            path: path.into(),
            source,
        }
    }
}

/// Result type for archive operations
pub type ArchiveResult<T> = Result<T, ArchiveError>;
