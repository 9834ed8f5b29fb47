//! Snapshot storage for the directory.
//!
//! A store holds at most one snapshot: the encoded bytes of the whole
//! [`Directory`](kinship_core::Directory). The service loads it once before
//! serving and writes it once at shutdown. The trait is synchronous, matching
//! the engine.

mod chaotic;
mod error;
mod memory;
mod redb;

pub use chaotic::ChaoticStorage;
pub use error::StorageError;
pub use memory::MemoryStorage;

pub use self::redb::RedbStorage;

/// Backend that keeps the latest directory snapshot.
///
/// Must be Clone (tests keep a handle to inspect what was saved) and
/// synchronous. Implementations share internal state via Arc, so clones see
/// the same snapshot.
pub trait SnapshotStore: Clone + Send + Sync + 'static {
    /// Replace the stored snapshot with `bytes`.
    ///
    /// # Invariants
    ///
    /// - Post: a following `load_snapshot` returns exactly `bytes`
    /// - Post: on error, the previous snapshot is still intact
    fn store_snapshot(&self, bytes: &[u8]) -> Result<(), StorageError>;

    /// Latest stored snapshot. `None` if nothing was ever stored.
    fn load_snapshot(&self) -> Result<Option<Vec<u8>>, StorageError>;
}
