//! Whole-directory snapshots.
//!
//! The engine knows nothing about files. A boundary layer calls
//! [`Directory::export`] once at shutdown and [`Directory::import`] once at
//! startup, and decides where the bytes live.
//!
//! # Format
//!
//! CBOR (via ciborium) of a versioned record holding every account, sorted by
//! id so the same state always encodes to the same bytes, plus the session
//! table and counter.
//!
//! # Invariants checked on import
//!
//! - Account ids are unique
//! - Every session token belongs to an existing account and was minted
//!   below the stored counter
//! - The counter can still mint another token
//! - Friendship is symmetric and never points at a missing account
//! - A pair is never both friends and pending, and never invited each other
//! - No account lists itself as friend or inviter

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    account::Account, directory::Directory, error::DirectoryError, session::SessionRegistry,
};

/// Snapshot format version written by this build.
pub const SNAPSHOT_VERSION: u16 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u16,
    accounts: Vec<&'a Account>,
    sessions: &'a SessionRegistry,
}

#[derive(Deserialize)]
struct SnapshotOwned {
    version: u16,
    accounts: Vec<Account>,
    sessions: SessionRegistry,
}

impl Directory {
    /// Encode the full directory state.
    pub fn export(&self) -> Result<Vec<u8>, DirectoryError> {
        let mut accounts: Vec<&Account> = self.accounts().collect();
        accounts.sort_unstable_by(|a, b| a.id().cmp(b.id()));

        let snapshot =
            SnapshotRef { version: SNAPSHOT_VERSION, accounts, sessions: self.sessions() };

        let mut bytes = Vec::new();
        ciborium::into_writer(&snapshot, &mut bytes)
            .map_err(|e| DirectoryError::Persistence(e.to_string()))?;

        debug!(accounts = self.account_count(), bytes = bytes.len(), "directory exported");
        Ok(bytes)
    }

    /// Decode a directory previously produced by [`Directory::export`].
    ///
    /// Rejects unknown versions and blobs whose contents break engine
    /// invariants.
    pub fn import(bytes: &[u8]) -> Result<Self, DirectoryError> {
        let snapshot: SnapshotOwned = ciborium::from_reader(bytes)
            .map_err(|e| DirectoryError::Persistence(e.to_string()))?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(DirectoryError::Persistence(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }

        let mut accounts = HashMap::with_capacity(snapshot.accounts.len());
        for account in snapshot.accounts {
            let id = account.id().to_owned();
            if accounts.insert(id.clone(), account).is_some() {
                return Err(corrupt(format!("duplicate account {id}")));
            }
        }

        validate(&accounts, &snapshot.sessions)?;

        let directory = Self::from_parts(accounts, snapshot.sessions);
        debug!(accounts = directory.account_count(), "directory imported");
        Ok(directory)
    }
}

fn corrupt(message: String) -> DirectoryError {
    DirectoryError::Persistence(format!("corrupt snapshot: {message}"))
}

fn validate(
    accounts: &HashMap<String, Account>,
    sessions: &SessionRegistry,
) -> Result<(), DirectoryError> {
    if sessions.next_counter() == u64::MAX {
        return Err(corrupt("session counter is exhausted".to_owned()));
    }

    for (token, owner) in sessions.iter() {
        if !accounts.contains_key(owner) {
            return Err(corrupt(format!("session {token} belongs to missing account {owner}")));
        }
        if !token.parse::<u64>().is_ok_and(|minted| minted < sessions.next_counter()) {
            return Err(corrupt(format!("session {token} was not minted by this counter")));
        }
    }

    for account in accounts.values() {
        let id = account.id();
        let graph = account.graph();

        if graph.is_friend(id) || graph.has_invite_from(id) {
            return Err(corrupt(format!("account {id} relates to itself")));
        }

        for friend in graph.friends().iter() {
            let reciprocal = accounts.get(friend).is_some_and(|peer| peer.graph().is_friend(id));
            if !reciprocal {
                return Err(corrupt(format!("friendship {id} -> {friend} is not mutual")));
            }
            if graph.has_invite_from(friend) {
                return Err(corrupt(format!("{id} and {friend} are both friends and pending")));
            }
        }

        for inviter in graph.pending_invites().iter() {
            let Some(peer) = accounts.get(inviter) else {
                return Err(corrupt(format!("invite to {id} from missing account {inviter}")));
            };
            if peer.graph().has_invite_from(id) {
                return Err(corrupt(format!("{id} and {inviter} have invited each other")));
            }
        }
    }

    Ok(())
}
