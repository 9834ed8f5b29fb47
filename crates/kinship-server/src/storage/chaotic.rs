//! Fault-injecting snapshot store.
//!
//! Wraps another store and fails a seeded fraction of calls, so tests can
//! check that a failed save surfaces as a persistence error and leaves the
//! last good snapshot in place.

#![allow(clippy::disallowed_types, reason = "Guards a tiny PRNG and a counter")]

use std::sync::{Arc, Mutex};

use super::{SnapshotStore, StorageError};

const DEFAULT_SEED: u64 = 0x1234_5678_9ABC_DEF0;

/// Store wrapper that fails calls at a configured rate.
///
/// A failed call never reaches the inner store. Clones share the same
/// random sequence and counter.
#[derive(Clone)]
pub struct ChaoticStorage<S: SnapshotStore> {
    inner: S,
    failure_rate: f64,
    state: Arc<Mutex<ChaosState>>,
}

/// Seeded generator plus call counter.
struct ChaosState {
    lcg: u64,
    calls: usize,
}

impl ChaosState {
    /// Advance the generator and return a sample in [0.0, 1.0).
    fn sample(&mut self) -> f64 {
        // Numerical Recipes LCG, modulo 2^32
        const MULTIPLIER: u64 = 1_664_525;
        const INCREMENT: u64 = 1_013_904_223;
        const MODULUS: u64 = 1 << 32;

        self.lcg = self.lcg.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT) % MODULUS;
        self.lcg as f64 / MODULUS as f64
    }
}

impl<S: SnapshotStore> ChaoticStorage<S> {
    /// Wrap `inner` with the default seed.
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is outside [0.0, 1.0].
    pub fn new(inner: S, failure_rate: f64) -> Self {
        Self::with_seed(inner, failure_rate, DEFAULT_SEED)
    }

    /// Wrap `inner` with an explicit seed. Equal seeds fail the same calls.
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is outside [0.0, 1.0].
    #[allow(clippy::panic)]
    pub fn with_seed(inner: S, failure_rate: f64, seed: u64) -> Self {
        assert!(
            (0.0..=1.0).contains(&failure_rate),
            "failure_rate must be between 0.0 and 1.0, got {failure_rate}"
        );

        let state = ChaosState { lcg: seed, calls: 0 };
        Self { inner, failure_rate, state: Arc::new(Mutex::new(state)) }
    }

    /// The wrapped store, for inspecting what survived.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Store and load calls attempted so far, failed ones included.
    #[allow(clippy::expect_used)]
    pub fn operation_count(&self) -> usize {
        self.state.lock().expect("chaos state poisoned").calls
    }

    /// Count the call and decide whether it fails.
    #[allow(clippy::expect_used)]
    fn roll(&self) -> Result<(), StorageError> {
        let mut state = self.state.lock().expect("chaos state poisoned");
        state.calls += 1;
        if state.sample() < self.failure_rate {
            return Err(StorageError::Io("chaotic failure injection".to_owned()));
        }
        Ok(())
    }
}

impl<S: SnapshotStore> SnapshotStore for ChaoticStorage<S> {
    fn store_snapshot(&self, bytes: &[u8]) -> Result<(), StorageError> {
        self.roll()?;
        self.inner.store_snapshot(bytes)
    }

    fn load_snapshot(&self) -> Result<Option<Vec<u8>>, StorageError> {
        self.roll()?;
        self.inner.load_snapshot()
    }
}
