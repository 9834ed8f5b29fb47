//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture a directory's relationships and sessions at a point in
//! time. Invariants operate on snapshots rather than the live directory so
//! they can also be fed hand-built, deliberately broken states.

use std::collections::BTreeMap;

use kinship_core::Directory;

/// Snapshot of an entire directory.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    /// Per-account state, keyed by id.
    pub accounts: BTreeMap<String, AccountSnapshot>,
    /// `(token, account id)` pairs.
    pub sessions: Vec<(String, String)>,
    /// Counter the next token will be minted from.
    pub next_session_counter: u64,
}

impl SystemSnapshot {
    /// Create an empty snapshot (no accounts).
    pub fn empty() -> Self {
        Self { next_session_counter: 1, ..Self::default() }
    }

    /// Capture a real directory.
    pub fn from_directory(directory: &Directory) -> Self {
        let mut snapshot = Self::empty();
        for id in directory.account_ids() {
            if let Ok(account) = directory.resolve(id) {
                let graph = account.graph();
                snapshot.add_account(
                    id,
                    AccountSnapshot {
                        friends: graph.friends().iter().map(str::to_owned).collect(),
                        pending_invites: graph.pending_invites().iter().map(str::to_owned).collect(),
                    },
                );
            }
        }
        snapshot.sessions = directory
            .sessions()
            .iter()
            .map(|(token, owner)| (token.to_owned(), owner.to_owned()))
            .collect();
        snapshot.next_session_counter = directory.sessions().next_counter();
        snapshot
    }

    /// Add an account snapshot.
    pub fn add_account(&mut self, id: &str, account: AccountSnapshot) {
        self.accounts.insert(id.to_owned(), account);
    }

    /// Add a session.
    pub fn add_session(&mut self, token: &str, owner: &str) {
        self.sessions.push((token.to_owned(), owner.to_owned()));
    }
}

/// Snapshot of one account's relationships.
#[derive(Debug, Clone, Default)]
pub struct AccountSnapshot {
    /// Friend ids in stored order.
    pub friends: Vec<String>,
    /// Ids that invited this account, in stored order.
    pub pending_invites: Vec<String>,
}

impl AccountSnapshot {
    /// Create an account with no relationships.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add friends.
    pub fn with_friends<'a>(mut self, ids: impl IntoIterator<Item = &'a str>) -> Self {
        self.friends.extend(ids.into_iter().map(str::to_owned));
        self
    }

    /// Add pending invites.
    pub fn with_pending<'a>(mut self, ids: impl IntoIterator<Item = &'a str>) -> Self {
        self.pending_invites.extend(ids.into_iter().map(str::to_owned));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot() {
        let snapshot = SystemSnapshot::empty();
        assert!(snapshot.accounts.is_empty());
        assert_eq!(snapshot.next_session_counter, 1);
    }

    #[test]
    fn captures_directory() {
        let mut directory = Directory::new();
        directory.create_account(Some("alice"), Some("p1"), "Alice").unwrap();
        directory.create_account(Some("bob"), Some("p2"), "Bob").unwrap();
        directory.request_friendship("alice", "bob").unwrap();
        directory.send_message("alice", "bob", "hi").unwrap();
        directory.login("bob", "p2").unwrap();

        let snapshot = SystemSnapshot::from_directory(&directory);

        assert_eq!(snapshot.accounts.len(), 2);
        assert_eq!(snapshot.accounts["bob"].pending_invites, ["alice"]);
        assert_eq!(snapshot.sessions, [("1".to_owned(), "bob".to_owned())]);
        assert_eq!(snapshot.next_session_counter, 2);
    }
}
