//! Service error types.

use kinship_core::DirectoryError;
use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by the [`Service`](crate::Service) facade.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// An engine rule rejected the operation, or a snapshot failed to encode
    /// or decode.
    ///
    /// See [`DirectoryError`] for the individual kinds.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// The snapshot store failed to read or write.
    ///
    /// The in-memory directory is unaffected; the caller may retry the save.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ServiceError {
    /// Returns true if this error came from loading or saving state rather
    /// than from an engine rule.
    pub fn is_persistence(&self) -> bool {
        match self {
            Self::Directory(err) => err.is_persistence(),
            Self::Storage(_) => true,
        }
    }
}
