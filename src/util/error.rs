//! Error types for the HDA file format.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for HDA file format operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Asset library does not exist or cannot be accessed
    #[error("Asset not found: {0}")]
    AssetNotFound(PathBuf),

    /// The procedural engine could not start a session
    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The engine loaded the asset but the cook failed
    #[error("Cook failed for {asset}: {reason}")]
    CookFailed { asset: String, reason: String },

    /// The session backing a document was released
    #[error("Engine session was released")]
    SessionLost,

    /// A cook argument could not be decoded
    #[error("Invalid cook argument {key}={value:?}")]
    InvalidArgument { key: String, value: String },

    /// Malformed scene path or identifier
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a cook failure for the named asset.
    pub fn cook_failed(asset: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CookFailed {
            asset: asset.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidArgument {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Result type alias for HDA file format operations.
pub type Result<T> = std::result::Result<T, Error>;
