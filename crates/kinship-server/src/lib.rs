//! Kinship server: persistence boundary and service facade.
//!
//! Wraps [`kinship_core`]'s in-memory [`Directory`](kinship_core::Directory)
//! with snapshot storage and a string-level API. The engine never sees a
//! file; this crate moves its exported bytes in and out of a
//! [`SnapshotStore`].
//!
//! # Components
//!
//! - [`Service`]: loads once on open, saves on shutdown, forwards operations
//! - [`RedbStorage`]: durable single-file store used by the `kinship` binary
//! - [`MemoryStorage`]: in-process store for tests
//! - [`ChaoticStorage`]: fault-injecting wrapper for persistence tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod service;
pub mod storage;

pub use error::ServiceError;
pub use service::{Service, render_id_set};
pub use storage::{ChaoticStorage, MemoryStorage, RedbStorage, SnapshotStore, StorageError};
