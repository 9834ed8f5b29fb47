//! Redb-backed durable snapshot storage.
//!
//! The whole directory lives in one database file. Redb's copy-on-write
//! transactions make a save atomic: after a crash the file holds either the
//! previous snapshot or the new one, never a mix.

use std::{path::Path, sync::Arc};

use redb::{Database, TableDefinition};
use tracing::debug;

use super::{SnapshotStore, StorageError};

/// Table: snapshots
/// Key: snapshot name (only [`DIRECTORY_KEY`] is used)
/// Value: encoded directory snapshot
const SNAPSHOTS: TableDefinition<&str, &[u8]> = TableDefinition::new("snapshots");

/// Key under which the directory snapshot is stored.
const DIRECTORY_KEY: &str = "directory";

/// Durable snapshot storage backed by Redb.
///
/// Thread-safe through Redb's internal locking. Clone is cheap (Arc).
#[derive(Clone)]
pub struct RedbStorage {
    db: Arc<Database>,
}

impl RedbStorage {
    /// Open or create a Redb database at the given path.
    ///
    /// Creates the SNAPSHOTS table if it doesn't exist. A freshly created
    /// database holds no snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the database cannot be opened or created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db = Database::create(path.as_ref()).map_err(|e| StorageError::Io(e.to_string()))?;

        let txn = db.begin_write().map_err(|e| StorageError::Io(e.to_string()))?;
        {
            let _ = txn.open_table(SNAPSHOTS).map_err(|e| StorageError::Io(e.to_string()))?;
        }
        txn.commit().map_err(|e| StorageError::Io(e.to_string()))?;

        debug!(path = %path.as_ref().display(), "snapshot database opened");
        Ok(Self { db: Arc::new(db) })
    }
}

impl SnapshotStore for RedbStorage {
    fn store_snapshot(&self, bytes: &[u8]) -> Result<(), StorageError> {
        let txn = self.db.begin_write().map_err(|e| StorageError::Io(e.to_string()))?;

        {
            let mut table =
                txn.open_table(SNAPSHOTS).map_err(|e| StorageError::Io(e.to_string()))?;

            table.insert(DIRECTORY_KEY, bytes).map_err(|e| StorageError::Io(e.to_string()))?;
        }

        txn.commit().map_err(|e| StorageError::Io(e.to_string()))?;

        Ok(())
    }

    fn load_snapshot(&self) -> Result<Option<Vec<u8>>, StorageError> {
        let txn = self.db.begin_read().map_err(|e| StorageError::Io(e.to_string()))?;

        let table = txn.open_table(SNAPSHOTS).map_err(|e| StorageError::Io(e.to_string()))?;

        match table.get(DIRECTORY_KEY).map_err(|e| StorageError::Io(e.to_string()))? {
            Some(value) => Ok(Some(value.value().to_vec())),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn fresh_database_has_no_snapshot() {
        let dir = tempdir().unwrap();
        let storage = RedbStorage::open(dir.path().join("test.redb")).unwrap();

        assert_eq!(storage.load_snapshot().unwrap(), None);
    }

    #[test]
    fn store_and_load_snapshot() {
        let dir = tempdir().unwrap();
        let storage = RedbStorage::open(dir.path().join("test.redb")).unwrap();

        storage.store_snapshot(b"snapshot one").unwrap();
        assert_eq!(storage.load_snapshot().unwrap().as_deref(), Some(&b"snapshot one"[..]));

        storage.store_snapshot(b"two").unwrap();
        assert_eq!(storage.load_snapshot().unwrap().as_deref(), Some(&b"two"[..]));
    }

    #[test]
    fn empty_snapshot_is_distinct_from_none() {
        let dir = tempdir().unwrap();
        let storage = RedbStorage::open(dir.path().join("test.redb")).unwrap();

        storage.store_snapshot(&[]).unwrap();
        assert_eq!(storage.load_snapshot().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn open_fails_for_missing_directory() {
        let dir = tempdir().unwrap();
        let result = RedbStorage::open(dir.path().join("no/such/dir/test.redb"));

        assert!(matches!(result, Err(StorageError::Io(_))));
    }
}
