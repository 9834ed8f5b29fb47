//! Testing harness for the Kinship engine.
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference implementation of the directory.
//! Operations are applied to both the model and a real
//! [`Directory`](kinship_core::Directory), and their results and observable
//! states are compared.
//!
//! # Invariant Testing
//!
//! The `invariants` module checks structural properties of a directory that
//! must hold after every operation. Use [`InvariantRegistry::standard()`] for
//! the full set.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod model;

pub use invariants::{
    AccountSnapshot, CrossInvitesCollapsed, FriendshipSymmetry, Invariant, InvariantRegistry,
    InvariantResult, PendingExcludesFriends, ReferencesResolve, SessionsResolve, SystemSnapshot,
    Violation,
};
pub use model::{
    ACCOUNT_UNIVERSE, AccountIndex, ModelWorld, ObservableAccount, ObservableState, Operation,
    OperationError, OperationResult, account_id,
};
