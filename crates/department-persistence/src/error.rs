//! Persistence error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for persistence operations.
pub type Result<T> = std::result::Result<T, PersistError>;

/// Errors raised by the persistence layer.
///
/// These only surface on writes; a snapshot that cannot be read or
/// parsed is handled by degraded loading instead.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Failed to create a directory for the snapshot file.
    #[error("failed to create directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the snapshot file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize the snapshot.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
