//! Error types for playlist and playback management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Operation would break a playlist invariant (e.g. removing the last track)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// No track with the given id
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// Media device rejected a command
    #[error("Media device error: {0}")]
    Device(String),

    /// Key/value store read or write failed
    #[error("Store error: {0}")]
    Store(String),

    /// Persisted data could not be encoded or decoded
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A file could not be turned into a playable source
    #[error("Import error: {0}")]
    Import(String),
}

impl PlaybackError {
    /// Create a device error
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create an import error
    pub fn import(msg: impl Into<String>) -> Self {
        Self::Import(msg.into())
    }
}

impl From<config::ConfigError> for PlaybackError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
