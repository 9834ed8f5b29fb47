//! Storage error types.

use thiserror::Error;

/// Errors from a [`SnapshotStore`](super::SnapshotStore) backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backend could not read or write its artifact.
    ///
    /// May be transient (disk full, file locked) or permanent (corruption).
    /// Check the message for details.
    #[error("storage I/O error: {0}")]
    Io(String),
}
