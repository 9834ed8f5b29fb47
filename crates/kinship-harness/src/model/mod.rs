//! Model-based testing infrastructure.
//!
//! [`ModelWorld`] is a deliberately naive reference directory: friendships
//! and invites are flat lists of pairs rather than per-account sets. Random
//! [`Operation`] sequences are applied to it and to the real engine, and both
//! must agree on every result and on the final [`ObservableState`].

mod operation;
mod world;

pub use operation::{
    ACCOUNT_UNIVERSE, AccountIndex, Operation, OperationError, OperationResult, account_id,
};
pub use world::{ModelWorld, ObservableAccount, ObservableState};
