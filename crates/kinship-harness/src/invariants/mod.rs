//! Structural invariants of a directory.
//!
//! A [`SystemSnapshot`] copies relationships and sessions out of a
//! [`Directory`](kinship_core::Directory); each [`Invariant`] inspects the
//! copy. Model-based tests and fuzz targets run [`InvariantRegistry::standard`]
//! after every operation.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let snapshot = SystemSnapshot::from_directory(&directory);
//! registry.check_all(&snapshot)?;
//! ```

use std::fmt;

mod checks;
mod snapshot;

pub use checks::{
    CrossInvitesCollapsed, FriendshipSymmetry, PendingExcludesFriends, ReferencesResolve,
    SessionsResolve,
};
pub use snapshot::{AccountSnapshot, SystemSnapshot};

/// Outcome of a single invariant check.
pub type InvariantResult = Result<(), Violation>;

/// A broken invariant and what broke it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Which invariant failed.
    pub invariant: &'static str,
    /// Offending accounts or sessions.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// Structural property of a directory snapshot.
pub trait Invariant: Send + Sync {
    /// Stable name used in violation reports.
    fn name(&self) -> &'static str;

    /// Check `state`, returning the first offending entry found.
    fn check(&self, state: &SystemSnapshot) -> InvariantResult;
}

/// Ordered set of invariants run together.
#[derive(Default)]
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl InvariantRegistry {
    /// Registry with nothing in it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every directory invariant:
    ///
    /// - [`FriendshipSymmetry`]
    /// - [`PendingExcludesFriends`]
    /// - [`CrossInvitesCollapsed`]
    /// - [`ReferencesResolve`]
    /// - [`SessionsResolve`]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(FriendshipSymmetry);
        registry.add(PendingExcludesFriends);
        registry.add(CrossInvitesCollapsed);
        registry.add(ReferencesResolve);
        registry.add(SessionsResolve);
        registry
    }

    /// Append an invariant; checks run in insertion order.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Run every invariant and collect all violations, in registry order.
    pub fn check_all(&self, state: &SystemSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<Violation> =
            self.invariants.iter().filter_map(|invariant| invariant.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Like [`check_all`](Self::check_all), but panics listing every
    /// violation. For tests and fuzz targets.
    #[allow(clippy::panic)]
    pub fn assert_all(&self, state: &SystemSnapshot, context: &str) {
        let Err(violations) = self.check_all(state) else {
            return;
        };
        let report: Vec<String> = violations.iter().map(Violation::to_string).collect();
        panic!("{} invariant(s) violated {context}:\n  {}", report.len(), report.join("\n  "));
    }

    /// Number of invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if no invariants are registered.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}
