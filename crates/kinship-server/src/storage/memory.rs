#![allow(clippy::disallowed_types, reason = "Synchronous in-memory operations only")]

use std::sync::{Arc, Mutex};

use super::{SnapshotStore, StorageError};

/// In-memory snapshot store for testing and simulation
///
/// Wraps the bytes in Arc<Mutex<>> so clones observe the same snapshot. Uses
/// `lock().expect()`, which panics if the mutex is poisoned; acceptable for
/// test code.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryStorageInner>>,
}

#[derive(Default)]
struct MemoryStorageInner {
    /// Latest snapshot bytes
    snapshot: Option<Vec<u8>>,

    /// Number of successful stores
    store_count: usize,
}

impl MemoryStorage {
    /// Create an empty `MemoryStorage`
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `bytes`, as if saved by an earlier
    /// run.
    pub fn with_snapshot(bytes: Vec<u8>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryStorageInner { snapshot: Some(bytes), store_count: 0 })),
        }
    }

    /// Number of times a snapshot was stored.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned (a thread panicked while
    /// holding the lock). This is acceptable for test/simulation code.
    #[allow(clippy::expect_used)]
    pub fn store_count(&self) -> usize {
        self.inner.lock().expect("Mutex poisoned").store_count
    }
}

impl SnapshotStore for MemoryStorage {
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for test
    /// code.
    #[allow(clippy::expect_used)]
    fn store_snapshot(&self, bytes: &[u8]) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().expect("Mutex poisoned");
        inner.snapshot = Some(bytes.to_vec());
        inner.store_count += 1;
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for test
    /// code.
    #[allow(clippy::expect_used)]
    fn load_snapshot(&self) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.inner.lock().expect("Mutex poisoned").snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_has_no_snapshot() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.load_snapshot().unwrap(), None);
        assert_eq!(storage.store_count(), 0);
    }

    #[test]
    fn store_replaces_previous_snapshot() {
        let storage = MemoryStorage::new();

        storage.store_snapshot(b"first").unwrap();
        storage.store_snapshot(b"second").unwrap();

        assert_eq!(storage.load_snapshot().unwrap().as_deref(), Some(&b"second"[..]));
        assert_eq!(storage.store_count(), 2);
    }

    #[test]
    fn clones_share_state() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();

        storage.store_snapshot(b"shared").unwrap();

        assert_eq!(handle.load_snapshot().unwrap().as_deref(), Some(&b"shared"[..]));
    }

    #[test]
    fn with_snapshot_preloads_bytes() {
        let storage = MemoryStorage::with_snapshot(vec![1, 2, 3]);
        assert_eq!(storage.load_snapshot().unwrap(), Some(vec![1, 2, 3]));
    }
}
