//! # Domain Errors
//!
//! Error types for Block Sync.

use thiserror::Error;

/// Block height type.
pub type Height = u64;

/// Block sync error types.
///
/// None of these is fatal: the service logs them and carries on with the
/// next block or the next cycle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Transport-level failure talking to the chain API.
    #[error("Network error: {0}")]
    Network(String),

    /// Chain API answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Http {
        /// Status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Response body was not the expected JSON shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Block lacks a required field or carries an unparsable one.
    #[error("Malformed block: {reason}")]
    MalformedBlock {
        /// What was wrong
        reason: String,
    },

    /// Block is not newer than the newest stored record.
    #[error("Stale block {height} (newest stored: {newest})")]
    StaleBlock {
        /// Height of the rejected block
        height: Height,
        /// Newest height already stored
        newest: Height,
    },

    /// Chain API returned a different height than requested.
    #[error("Height mismatch: requested {requested}, got {got}")]
    HeightMismatch {
        /// Requested height
        requested: Height,
        /// Height in the response
        got: Height,
    },
}

impl SyncError {
    /// Shorthand for [`SyncError::MalformedBlock`].
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedBlock {
            reason: reason.into(),
        }
    }

    /// True for failures of the transport rather than the payload.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Http { .. })
    }
}

/// Validator directory loading errors.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// File could not be read.
    #[error("Failed to read validator directory {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// TOML did not parse.
    #[error("Failed to parse validator directory: {0}")]
    Parse(String),

    /// File declares a format version this build does not understand.
    #[error("Unsupported validator directory version {0}")]
    UnsupportedVersion(u32),

    /// Same identity listed twice.
    #[error("Duplicate validator identity: {0}")]
    DuplicateIdentity(String),

    /// Entry with an empty identity.
    #[error("Validator entry with empty identity (name: {0})")]
    EmptyIdentity(String),
}
