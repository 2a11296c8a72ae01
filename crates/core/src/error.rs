//! Error types for the filename codec
//!
//! A persisted file name either follows `prefix.hexZxid` exactly or it is
//! malformed. `NameError` says which part of the name is wrong.

use thiserror::Error;

/// Result type alias for name parsing
pub type NameResult<T> = std::result::Result<T, NameError>;

/// A file name that does not follow the `prefix.hexZxid` convention
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// Name does not start with `prefix.`
    #[error("'{name}' does not start with '{prefix}.'")]
    WrongPrefix {
        /// The offending file name
        name: String,
        /// The prefix that was expected
        prefix: String,
    },

    /// Nothing follows the separator
    #[error("'{name}' has no zxid after the separator")]
    MissingZxid {
        /// The offending file name
        name: String,
    },

    /// Suffix is not a hexadecimal u64
    #[error("'{name}' has a zxid suffix '{suffix}' that is not valid 64-bit hex")]
    InvalidHex {
        /// The offending file name
        name: String,
        /// The suffix that failed to parse
        suffix: String,
    },
}

impl NameError {
    /// The file name that failed to parse
    pub fn name(&self) -> &str {
        match self {
            NameError::WrongPrefix { name, .. }
            | NameError::MissingZxid { name }
            | NameError::InvalidHex { name, .. } => name,
        }
    }
}
