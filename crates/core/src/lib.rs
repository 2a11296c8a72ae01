//! Core types for zkarchive
//!
//! This crate defines the naming convention shared with the coordination
//! service whose persisted state is being archived:
//! - Zxid: the 64-bit transaction id embedded in every persisted file name
//! - FileKind: snapshot or transaction log, each with its fixed prefix
//! - PersistedFile: a file on disk identified by kind and zxid
//! - NameError: why a file name does not follow `prefix.hexZxid`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod naming;

pub use error::{NameError, NameResult};
pub use naming::{
    file_name_for, parse_zxid, FileKind, PersistedFile, Zxid, LOG_PREFIX, SEPARATOR,
    SNAPSHOT_PREFIX,
};
