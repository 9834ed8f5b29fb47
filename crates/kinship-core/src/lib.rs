//! Kinship core: the account, friendship, session and mailbox engine.
//!
//! Pure in-memory state with no I/O. The boundary crate drives persistence by
//! exporting and importing snapshots as bytes.
//!
//! # Components
//!
//! - [`Directory`]: aggregate store and sole entry point for operations
//! - [`Account`]: identity, credential and profile attributes
//! - [`FriendGraph`]: per-account friends and received invites
//! - [`Mailbox`]: per-account FIFO inbox
//! - [`SessionRegistry`]: login tokens minted from a counter
//!
//! # Friendship
//!
//! ```text
//!            a invites b                      b invites a
//! Strangers ─────────────► a pending on b ─────────────────► Friends
//! ```
//!
//! Invites are never withdrawn and friendships never end.
//!
//! Acceptance writes both accounts within the same call, so friendship is
//! symmetric after every operation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
mod directory;
mod error;
pub mod friends;
pub mod mailbox;
pub mod session;
mod snapshot;

pub use account::{Account, LOGIN_ATTRIBUTE, NAME_ATTRIBUTE};
pub use directory::Directory;
pub use error::{DirectoryError, InvalidAccountData};
pub use friends::{FriendGraph, FriendRequestOutcome, FriendshipState, OrderedIds};
pub use mailbox::Mailbox;
pub use session::SessionRegistry;
pub use snapshot::SNAPSHOT_VERSION;
