//! Per-account friendship state.
//!
//! Each account carries a [`FriendGraph`]: the accounts it is friends with
//! and the accounts whose invites it has received but not answered. Invites
//! live on the invitee only. The cross-account transitions (invite, accept)
//! are driven by the [`Directory`](crate::Directory), which is the only place
//! that can touch two graphs within one operation.

use serde::{Deserialize, Serialize};

/// Set of account ids that remembers insertion order.
///
/// Friend and invite sets stay small, so membership is a linear scan over a
/// `Vec`. Iteration yields ids in the order they were first inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct OrderedIds {
    ids: Vec<String>,
}

impl OrderedIds {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `id` is in the set.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// Insert `id` at the end. Returns `false` if it was already present.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_owned());
        true
    }

    /// Remove `id`, keeping the order of the rest. Returns `false` if absent.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.ids.iter().position(|existing| existing == id) {
            Some(index) => {
                self.ids.remove(index);
                true
            },
            None => false,
        }
    }

    /// Ids in insertion order.
    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }

    /// Iterate ids in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.ids.iter().map(String::as_str)
    }

    /// Number of ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl From<Vec<String>> for OrderedIds {
    fn from(ids: Vec<String>) -> Self {
        let mut set = Self::new();
        for id in &ids {
            set.insert(id);
        }
        set
    }
}

impl From<OrderedIds> for Vec<String> {
    fn from(set: OrderedIds) -> Self {
        set.ids
    }
}

/// Friends and received invites of one account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendGraph {
    friends: OrderedIds,
    pending_invites: OrderedIds,
}

impl FriendGraph {
    /// Create a graph with no friends and no pending invites.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts this account is friends with, in the order they became
    /// friends.
    pub fn friends(&self) -> &OrderedIds {
        &self.friends
    }

    /// Accounts that invited this account and are waiting for an answer.
    pub fn pending_invites(&self) -> &OrderedIds {
        &self.pending_invites
    }

    /// Check whether `id` is a friend.
    pub fn is_friend(&self, id: &str) -> bool {
        self.friends.contains(id)
    }

    /// Check whether `id` has an unanswered invite to this account.
    pub fn has_invite_from(&self, id: &str) -> bool {
        self.pending_invites.contains(id)
    }

    pub(crate) fn record_invite(&mut self, from: &str) {
        self.pending_invites.insert(from);
    }

    /// Turn the pending relation with `other` into friendship on this side.
    pub(crate) fn befriend(&mut self, other: &str) {
        self.friends.insert(other);
        self.pending_invites.remove(other);
    }
}

/// Relationship between two accounts, seen from the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FriendshipState {
    /// Neither friends nor any invite pending.
    Strangers,
    /// This account invited the other; waiting for the other to answer.
    InviteSent,
    /// The other account invited this one; waiting for this one to answer.
    InviteReceived,
    /// Mutual friends.
    Friends,
}

/// What a successful friend request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FriendRequestOutcome {
    /// A new invite is now pending on the target.
    Invited,
    /// The target had already invited the requester; both are now friends.
    Accepted,
}
