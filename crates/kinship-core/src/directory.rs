//! The account directory.
//!
//! [`Directory`] owns every account and the session table, and is the only
//! entry point into the engine. Operations resolve their account ids through
//! [`Directory::resolve`], delegate to the per-account structures, and either
//! return a value or a [`DirectoryError`].
//!
//! Cross-account operations decide everything up front against immutable
//! borrows, then apply their writes. A friendship acceptance therefore either
//! links both sides or changes nothing.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::{
    account::Account,
    error::{DirectoryError, InvalidAccountData},
    friends::{FriendRequestOutcome, FriendshipState},
    session::SessionRegistry,
};

/// Aggregate store of accounts and login sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    /// Account id → account
    accounts: HashMap<String, Account>,
    /// Issued login tokens
    sessions: SessionRegistry,
}

impl Directory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(
        accounts: HashMap<String, Account>,
        sessions: SessionRegistry,
    ) -> Self {
        Self { accounts, sessions }
    }

    pub(crate) fn accounts(&self) -> impl Iterator<Item = &Account> + '_ {
        self.accounts.values()
    }

    /// Register a new account.
    ///
    /// `id` and `credential` are optional because the boundary may forward
    /// missing values; both are required. Checks run in order: missing id,
    /// missing credential, duplicate id.
    pub fn create_account(
        &mut self,
        id: Option<&str>,
        credential: Option<&str>,
        display_name: &str,
    ) -> Result<(), DirectoryError> {
        let id = id.ok_or(InvalidAccountData::MissingId)?;
        let credential = credential.ok_or(InvalidAccountData::MissingCredential)?;

        if self.accounts.contains_key(id) {
            return Err(InvalidAccountData::DuplicateId.into());
        }

        self.accounts.insert(id.to_owned(), Account::new(id, credential, display_name));
        debug!(account = id, "account created");
        Ok(())
    }

    /// Look up an account by id.
    ///
    /// This is the only place [`DirectoryError::AccountNotFound`] originates.
    pub fn resolve(&self, id: &str) -> Result<&Account, DirectoryError> {
        self.accounts.get(id).ok_or(DirectoryError::AccountNotFound)
    }

    fn resolve_mut(&mut self, id: &str) -> Result<&mut Account, DirectoryError> {
        self.accounts.get_mut(id).ok_or(DirectoryError::AccountNotFound)
    }

    /// Check whether an account with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.accounts.contains_key(id)
    }

    /// Number of registered accounts.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// All account ids, sorted.
    pub fn account_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.accounts.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Read a profile attribute.
    ///
    /// `name` and `login` read the display name and id; anything else must
    /// have been written with [`Directory::set_attribute`].
    pub fn get_attribute(&self, id: &str, name: &str) -> Result<&str, DirectoryError> {
        self.resolve(id)?.attribute(name).ok_or(DirectoryError::AttributeNotSet)
    }

    /// Create or overwrite a profile attribute.
    pub fn set_attribute(
        &mut self,
        id: &str,
        name: &str,
        value: &str,
    ) -> Result<(), DirectoryError> {
        self.resolve_mut(id)?.set_attribute(name, value);
        debug!(account = id, attribute = name, "attribute set");
        Ok(())
    }

    /// Open a session.
    ///
    /// Unknown ids and wrong credentials both fail with
    /// [`DirectoryError::BadCredentials`]. On success a token is recorded and
    /// the account id is returned as the caller's session handle.
    pub fn login(&mut self, id: &str, credential: &str) -> Result<String, DirectoryError> {
        let account = self.accounts.get(id).ok_or(DirectoryError::BadCredentials)?;
        if !account.credential_matches(credential) {
            return Err(DirectoryError::BadCredentials);
        }

        let token = self.sessions.issue(id);
        debug!(account = id, token = %token, "session opened");
        Ok(id.to_owned())
    }

    /// Issued login tokens.
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Invite `to` to be friends with `from`, or accept `to`'s pending invite.
    ///
    /// Self-requests are rejected before any lookup. `to` is resolved before
    /// `from`. If `to` has already invited `from` the call accepts: both
    /// accounts gain each other as friends and both pending entries are
    /// cleared.
    pub fn request_friendship(
        &mut self,
        from: &str,
        to: &str,
    ) -> Result<FriendRequestOutcome, DirectoryError> {
        if from == to {
            return Err(DirectoryError::SelfFriendship);
        }

        let invitee = self.resolve(to)?;
        let inviter = self.resolve(from)?;

        if inviter.graph().has_invite_from(to) {
            self.resolve_mut(to)?.graph_mut().befriend(from);
            self.resolve_mut(from)?.graph_mut().befriend(to);
            debug!(from, to, "friend invite accepted");
            return Ok(FriendRequestOutcome::Accepted);
        }

        if invitee.graph().has_invite_from(from) {
            return Err(DirectoryError::DuplicateInvite);
        }

        if invitee.graph().is_friend(from) {
            return Err(DirectoryError::AlreadyFriends);
        }

        self.resolve_mut(to)?.graph_mut().record_invite(from);
        debug!(from, to, "friend invite sent");
        Ok(FriendRequestOutcome::Invited)
    }

    /// Check whether `other` is among `id`'s friends.
    pub fn are_friends(&self, id: &str, other: &str) -> Result<bool, DirectoryError> {
        Ok(self.resolve(id)?.graph().is_friend(other))
    }

    /// Friends of `id` in the order the friendships were made.
    pub fn list_friends(&self, id: &str) -> Result<&[String], DirectoryError> {
        Ok(self.resolve(id)?.graph().friends().as_slice())
    }

    /// Accounts that invited `id` and are still waiting, oldest first.
    pub fn pending_invites(&self, id: &str) -> Result<&[String], DirectoryError> {
        Ok(self.resolve(id)?.graph().pending_invites().as_slice())
    }

    /// Relationship between `id` and `other`, from `id`'s side.
    pub fn friendship_state(
        &self,
        id: &str,
        other: &str,
    ) -> Result<FriendshipState, DirectoryError> {
        let account = self.resolve(id)?;
        let peer = self.resolve(other)?;

        let state = if account.graph().is_friend(other) {
            FriendshipState::Friends
        } else if account.graph().has_invite_from(other) {
            FriendshipState::InviteReceived
        } else if peer.graph().has_invite_from(id) {
            FriendshipState::InviteSent
        } else {
            FriendshipState::Strangers
        };
        Ok(state)
    }

    /// Append `body` to `recipient`'s inbox.
    ///
    /// Self-messages are rejected before any lookup.
    pub fn send_message(
        &mut self,
        sender: &str,
        recipient: &str,
        body: &str,
    ) -> Result<(), DirectoryError> {
        if sender == recipient {
            return Err(DirectoryError::SelfMessage);
        }

        self.resolve(sender)?;
        let inbox = self.resolve_mut(recipient)?.inbox_mut();
        inbox.push(body.to_owned());
        debug!(sender, recipient, queued = inbox.len(), "message delivered");
        Ok(())
    }

    /// Remove and return the oldest message in `id`'s inbox.
    pub fn read_message(&mut self, id: &str) -> Result<String, DirectoryError> {
        self.resolve_mut(id)?.inbox_mut().pop().ok_or(DirectoryError::NoMessages)
    }

    /// Number of unread messages for `id`.
    pub fn unread_count(&self, id: &str) -> Result<usize, DirectoryError> {
        Ok(self.resolve(id)?.inbox().len())
    }

    /// Drop all accounts and sessions and restart the session counter.
    pub fn reset(&mut self) {
        self.accounts.clear();
        self.sessions.clear();
        info!("directory reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory_with(ids: &[&str]) -> Directory {
        let mut directory = Directory::new();
        for id in ids {
            directory.create_account(Some(*id), Some("secret"), id).unwrap();
        }
        directory
    }

    #[test]
    fn create_account_rejects_missing_fields() {
        let mut directory = Directory::new();

        assert_eq!(
            directory.create_account(None, Some("p"), "Nobody"),
            Err(DirectoryError::InvalidAccountData(InvalidAccountData::MissingId))
        );
        assert_eq!(
            directory.create_account(Some("alice"), None, "Alice"),
            Err(DirectoryError::InvalidAccountData(InvalidAccountData::MissingCredential))
        );
        assert_eq!(directory.account_count(), 0);
    }

    #[test]
    fn create_account_rejects_duplicate_id() {
        let mut directory = directory_with(&["alice"]);

        assert_eq!(
            directory.create_account(Some("alice"), Some("other"), "Impostor"),
            Err(DirectoryError::InvalidAccountData(InvalidAccountData::DuplicateId))
        );
        assert_eq!(directory.get_attribute("alice", "name"), Ok("alice"));
    }

    #[test]
    fn missing_id_checked_before_missing_credential() {
        let mut directory = Directory::new();

        assert_eq!(
            directory.create_account(None, None, ""),
            Err(DirectoryError::InvalidAccountData(InvalidAccountData::MissingId))
        );
    }

    #[test]
    fn resolve_unknown_account() {
        let directory = Directory::new();
        assert_eq!(directory.resolve("ghost").err(), Some(DirectoryError::AccountNotFound));
        assert_eq!(directory.get_attribute("ghost", "name"), Err(DirectoryError::AccountNotFound));
    }

    #[test]
    fn login_collapses_unknown_and_wrong_password() {
        let mut directory = directory_with(&["alice"]);

        assert_eq!(directory.login("ghost", "secret"), Err(DirectoryError::BadCredentials));
        assert_eq!(directory.login("alice", "wrong"), Err(DirectoryError::BadCredentials));
        assert!(directory.sessions().is_empty());

        assert_eq!(directory.login("alice", "secret").as_deref(), Ok("alice"));
        assert_eq!(directory.sessions().owner("1"), Some("alice"));
    }

    #[test]
    fn invite_then_reciprocal_accepts() {
        let mut directory = directory_with(&["alice", "bob"]);

        assert_eq!(directory.request_friendship("alice", "bob"), Ok(FriendRequestOutcome::Invited));
        assert_eq!(directory.friendship_state("alice", "bob"), Ok(FriendshipState::InviteSent));
        assert_eq!(directory.friendship_state("bob", "alice"), Ok(FriendshipState::InviteReceived));
        assert_eq!(directory.are_friends("alice", "bob"), Ok(false));

        assert_eq!(directory.request_friendship("bob", "alice"), Ok(FriendRequestOutcome::Accepted));
        assert_eq!(directory.are_friends("alice", "bob"), Ok(true));
        assert_eq!(directory.are_friends("bob", "alice"), Ok(true));
        assert!(directory.pending_invites("alice").unwrap().is_empty());
        assert!(directory.pending_invites("bob").unwrap().is_empty());
    }

    #[test]
    fn friend_request_errors() {
        let mut directory = directory_with(&["alice", "bob"]);

        assert_eq!(directory.request_friendship("alice", "alice"), Err(DirectoryError::SelfFriendship));

        directory.request_friendship("alice", "bob").unwrap();
        assert_eq!(directory.request_friendship("alice", "bob"), Err(DirectoryError::DuplicateInvite));

        directory.request_friendship("bob", "alice").unwrap();
        assert_eq!(directory.request_friendship("alice", "bob"), Err(DirectoryError::AlreadyFriends));
        assert_eq!(directory.request_friendship("bob", "alice"), Err(DirectoryError::AlreadyFriends));
    }

    #[test]
    fn self_friendship_checked_before_existence() {
        let mut directory = Directory::new();
        assert_eq!(directory.request_friendship("ghost", "ghost"), Err(DirectoryError::SelfFriendship));
        assert_eq!(directory.send_message("ghost", "ghost", "hi"), Err(DirectoryError::SelfMessage));
    }

    #[test]
    fn friend_request_to_unknown_target_changes_nothing() {
        let mut directory = directory_with(&["alice"]);

        assert_eq!(directory.request_friendship("alice", "ghost"), Err(DirectoryError::AccountNotFound));
        assert_eq!(directory.request_friendship("ghost", "alice"), Err(DirectoryError::AccountNotFound));
        assert!(directory.pending_invites("alice").unwrap().is_empty());
    }

    #[test]
    fn list_friends_keeps_order() {
        let mut directory = directory_with(&["alice", "bob", "carol", "dave"]);

        for friend in ["carol", "bob", "dave"] {
            directory.request_friendship(friend, "alice").unwrap();
            directory.request_friendship("alice", friend).unwrap();
        }

        assert_eq!(directory.list_friends("alice").unwrap(), ["carol", "bob", "dave"]);
        assert_eq!(directory.list_friends("bob").unwrap(), ["alice"]);
    }

    #[test]
    fn messages_are_fifo() {
        let mut directory = directory_with(&["alice", "bob"]);

        directory.send_message("alice", "bob", "m1").unwrap();
        directory.send_message("alice", "bob", "m2").unwrap();
        assert_eq!(directory.unread_count("bob"), Ok(2));

        assert_eq!(directory.read_message("bob").as_deref(), Ok("m1"));
        assert_eq!(directory.read_message("bob").as_deref(), Ok("m2"));
        assert_eq!(directory.read_message("bob"), Err(DirectoryError::NoMessages));
    }

    #[test]
    fn message_to_unknown_recipient_fails() {
        let mut directory = directory_with(&["alice"]);

        assert_eq!(directory.send_message("alice", "ghost", "hi"), Err(DirectoryError::AccountNotFound));
        assert_eq!(directory.send_message("ghost", "alice", "hi"), Err(DirectoryError::AccountNotFound));
        assert_eq!(directory.unread_count("alice"), Ok(0));
    }

    #[test]
    fn attributes_round_trip() {
        let mut directory = directory_with(&["alice"]);

        assert_eq!(directory.get_attribute("alice", "city"), Err(DirectoryError::AttributeNotSet));
        directory.set_attribute("alice", "city", "Maceio").unwrap();
        assert_eq!(directory.get_attribute("alice", "city"), Ok("Maceio"));
        assert_eq!(directory.get_attribute("alice", "login"), Ok("alice"));
    }

    #[test]
    fn reset_clears_everything() {
        let mut directory = directory_with(&["alice", "bob"]);
        directory.login("alice", "secret").unwrap();

        directory.reset();

        assert_eq!(directory, Directory::new());
        assert_eq!(directory.sessions().next_counter(), 1);
    }
}
