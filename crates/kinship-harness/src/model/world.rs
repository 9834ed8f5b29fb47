//! Model world - the reference directory.
//!
//! The world is the oracle against which the real engine is verified. It keeps
//! relationships as global pair lists instead of per-account sets, so a bug
//! in the engine's two-sided bookkeeping shows up as a divergence.

use std::collections::{BTreeMap, VecDeque};

use kinship_core::{Directory, LOGIN_ATTRIBUTE, NAME_ATTRIBUTE};

use super::operation::{
    AccountIndex, Operation, OperationError, OperationResult, account_id, attribute_name,
    attribute_value, credential, display_name, message_body,
};

/// Observable state of one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservableAccount {
    /// Login id.
    pub id: String,
    /// Display name.
    pub display_name: String,
    /// Written attributes, sorted by name.
    pub attributes: Vec<(String, String)>,
    /// Friends in the order the friendships formed.
    pub friends: Vec<String>,
    /// Accounts waiting on an answer, oldest first.
    pub pending_invites: Vec<String>,
    /// Unread messages, oldest first.
    pub inbox: Vec<String>,
}

/// Observable state for oracle comparison.
///
/// This is everything a caller can learn about a directory through its
/// public API, in a canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservableState {
    /// Accounts sorted by id.
    pub accounts: Vec<ObservableAccount>,
    /// `(token, account id)` pairs sorted by token.
    pub sessions: Vec<(String, String)>,
    /// Counter the next session token is minted from.
    pub next_session_counter: u64,
}

impl ObservableState {
    /// Extract the observable state of a real directory.
    pub fn from_directory(directory: &Directory) -> Self {
        let accounts = directory
            .account_ids()
            .into_iter()
            .filter_map(|id| directory.resolve(id).ok())
            .map(|account| ObservableAccount {
                id: account.id().to_owned(),
                display_name: account.display_name().to_owned(),
                attributes: account
                    .attributes()
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect(),
                friends: account.graph().friends().iter().map(str::to_owned).collect(),
                pending_invites: account
                    .graph()
                    .pending_invites()
                    .iter()
                    .map(str::to_owned)
                    .collect(),
                inbox: account.inbox().iter().map(str::to_owned).collect(),
            })
            .collect();

        let mut sessions: Vec<_> = directory
            .sessions()
            .iter()
            .map(|(token, id)| (token.to_owned(), id.to_owned()))
            .collect();
        sessions.sort();

        Self { accounts, sessions, next_session_counter: directory.sessions().next_counter() }
    }
}

#[derive(Debug, Clone)]
struct ModelAccount {
    credential: String,
    display_name: String,
    attributes: BTreeMap<String, String>,
    inbox: VecDeque<String>,
}

/// Model world - the reference implementation.
#[derive(Debug, Clone)]
pub struct ModelWorld {
    accounts: BTreeMap<String, ModelAccount>,
    /// Friend pairs in the order they formed
    friendships: Vec<(String, String)>,
    /// `(inviter, invitee)` pairs still waiting, oldest first
    invites: Vec<(String, String)>,
    sessions: Vec<(String, String)>,
    next_session: u64,
}

impl Default for ModelWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelWorld {
    /// Create an empty world.
    pub fn new() -> Self {
        Self {
            accounts: BTreeMap::new(),
            friendships: Vec::new(),
            invites: Vec::new(),
            sessions: Vec::new(),
            next_session: 1,
        }
    }

    /// Number of registered accounts.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Whether `a` and `b` are friends.
    pub fn are_friends(&self, a: &str, b: &str) -> bool {
        self.friendships.iter().any(|(x, y)| (x == a && y == b) || (x == b && y == a))
    }

    /// Whether `from` has an unanswered invite to `to`.
    pub fn has_invite(&self, from: &str, to: &str) -> bool {
        self.invites.iter().any(|(x, y)| x == from && y == to)
    }

    fn friends_of(&self, id: &str) -> Vec<String> {
        self.friendships
            .iter()
            .filter_map(|(a, b)| {
                if a == id {
                    Some(b.clone())
                } else if b == id {
                    Some(a.clone())
                } else {
                    None
                }
            })
            .collect()
    }

    fn invites_to(&self, id: &str) -> Vec<String> {
        self.invites.iter().filter(|(_, to)| to == id).map(|(from, _)| from.clone()).collect()
    }

    /// Apply an operation and return the result.
    ///
    /// The result should match [`Operation::apply_to`] on a real directory
    /// that has seen the same sequence.
    pub fn apply(&mut self, op: &Operation) -> OperationResult {
        let result = match *op {
            Operation::CreateAccount { account, omit_id, omit_credential } => {
                self.apply_create_account(account, omit_id, omit_credential)
            },
            Operation::Login { account, correct } => self.apply_login(account, correct),
            Operation::SetAttribute { account, key, value } => {
                self.apply_set_attribute(account, key, value)
            },
            Operation::GetAttribute { account, key } => self.apply_get_attribute(account, key),
            Operation::RequestFriendship { from, to } => self.apply_request_friendship(from, to),
            Operation::SendMessage { from, to, body } => self.apply_send_message(from, to, body),
            Operation::ReadMessage { account } => self.apply_read_message(account),
            Operation::Reset => {
                *self = Self::new();
                Ok(OperationResult::Ok)
            },
        };
        result.unwrap_or_else(OperationResult::Error)
    }

    fn require(&self, id: &str) -> Result<&ModelAccount, OperationError> {
        self.accounts.get(id).ok_or(OperationError::AccountNotFound)
    }

    fn require_mut(&mut self, id: &str) -> Result<&mut ModelAccount, OperationError> {
        self.accounts.get_mut(id).ok_or(OperationError::AccountNotFound)
    }

    fn apply_create_account(
        &mut self,
        account: AccountIndex,
        omit_id: bool,
        omit_credential: bool,
    ) -> Result<OperationResult, OperationError> {
        if omit_id {
            return Err(OperationError::MissingId);
        }
        if omit_credential {
            return Err(OperationError::MissingCredential);
        }

        let id = account_id(account);
        if self.accounts.contains_key(&id) {
            return Err(OperationError::DuplicateId);
        }

        self.accounts.insert(
            id,
            ModelAccount {
                credential: credential(account),
                display_name: display_name(account),
                attributes: BTreeMap::new(),
                inbox: VecDeque::new(),
            },
        );
        Ok(OperationResult::Ok)
    }

    fn apply_login(
        &mut self,
        account: AccountIndex,
        correct: bool,
    ) -> Result<OperationResult, OperationError> {
        let id = account_id(account);
        let attempt = if correct { credential(account) } else { "wrong".to_owned() };

        match self.accounts.get(&id) {
            Some(found) if found.credential == attempt => {},
            _ => return Err(OperationError::BadCredentials),
        }

        self.sessions.push((self.next_session.to_string(), id.clone()));
        self.next_session += 1;
        Ok(OperationResult::Value(id))
    }

    fn apply_set_attribute(
        &mut self,
        account: AccountIndex,
        key: u8,
        value: u8,
    ) -> Result<OperationResult, OperationError> {
        let found = self.require_mut(&account_id(account))?;
        found.attributes.insert(attribute_name(key).to_owned(), attribute_value(value));
        Ok(OperationResult::Ok)
    }

    fn apply_get_attribute(
        &self,
        account: AccountIndex,
        key: u8,
    ) -> Result<OperationResult, OperationError> {
        let id = account_id(account);
        let found = self.require(&id)?;

        let value = match attribute_name(key) {
            NAME_ATTRIBUTE => found.display_name.clone(),
            LOGIN_ATTRIBUTE => id,
            other => found.attributes.get(other).cloned().ok_or(OperationError::AttributeNotSet)?,
        };
        Ok(OperationResult::Value(value))
    }

    fn apply_request_friendship(
        &mut self,
        from: AccountIndex,
        to: AccountIndex,
    ) -> Result<OperationResult, OperationError> {
        let (from, to) = (account_id(from), account_id(to));
        if from == to {
            return Err(OperationError::SelfFriendship);
        }
        self.require(&to)?;
        self.require(&from)?;

        if let Some(index) = self.invites.iter().position(|(x, y)| *x == to && *y == from) {
            self.invites.remove(index);
            self.friendships.push((from, to));
            return Ok(OperationResult::Value("accepted".to_owned()));
        }
        if self.has_invite(&from, &to) {
            return Err(OperationError::DuplicateInvite);
        }
        if self.are_friends(&from, &to) {
            return Err(OperationError::AlreadyFriends);
        }

        self.invites.push((from, to));
        Ok(OperationResult::Value("invited".to_owned()))
    }

    fn apply_send_message(
        &mut self,
        from: AccountIndex,
        to: AccountIndex,
        body: u8,
    ) -> Result<OperationResult, OperationError> {
        let (from, to) = (account_id(from), account_id(to));
        if from == to {
            return Err(OperationError::SelfMessage);
        }
        self.require(&from)?;
        self.require_mut(&to)?.inbox.push_back(message_body(body));
        Ok(OperationResult::Ok)
    }

    fn apply_read_message(
        &mut self,
        account: AccountIndex,
    ) -> Result<OperationResult, OperationError> {
        let found = self.require_mut(&account_id(account))?;
        let message = found.inbox.pop_front().ok_or(OperationError::NoMessages)?;
        Ok(OperationResult::Value(message))
    }

    /// Observable state in the same canonical form as
    /// [`ObservableState::from_directory`].
    pub fn observable_state(&self) -> ObservableState {
        let accounts = self
            .accounts
            .iter()
            .map(|(id, account)| ObservableAccount {
                id: id.clone(),
                display_name: account.display_name.clone(),
                attributes: account
                    .attributes
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect(),
                friends: self.friends_of(id),
                pending_invites: self.invites_to(id),
                inbox: account.inbox.iter().cloned().collect(),
            })
            .collect();

        let mut sessions = self.sessions.clone();
        sessions.sort();

        ObservableState { accounts, sessions, next_session_counter: self.next_session }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(account: AccountIndex) -> Operation {
        Operation::CreateAccount { account, omit_id: false, omit_credential: false }
    }

    #[test]
    fn invite_then_accept() {
        let mut world = ModelWorld::new();
        world.apply(&create(0));
        world.apply(&create(1));

        let invite = Operation::RequestFriendship { from: 0, to: 1 };
        assert_eq!(world.apply(&invite), OperationResult::Value("invited".to_owned()));
        assert!(world.has_invite("user0", "user1"));
        assert_eq!(world.apply(&invite), OperationResult::Error(OperationError::DuplicateInvite));

        let accept = Operation::RequestFriendship { from: 1, to: 0 };
        assert_eq!(world.apply(&accept), OperationResult::Value("accepted".to_owned()));
        assert!(world.are_friends("user0", "user1"));
        assert!(!world.has_invite("user0", "user1"));

        assert_eq!(world.apply(&invite), OperationResult::Error(OperationError::AlreadyFriends));
    }

    #[test]
    fn reset_restarts_session_counter() {
        let mut world = ModelWorld::new();
        world.apply(&create(0));
        world.apply(&Operation::Login { account: 0, correct: true });
        assert_eq!(world.observable_state().next_session_counter, 2);

        world.apply(&Operation::Reset);
        let state = world.observable_state();
        assert!(state.accounts.is_empty());
        assert!(state.sessions.is_empty());
        assert_eq!(state.next_session_counter, 1);
    }

    #[test]
    fn empty_model_matches_empty_directory() {
        let world = ModelWorld::new();

        assert_eq!(world.observable_state(), ObservableState::from_directory(&Directory::new()));
        assert_eq!(world.account_count(), 0);
    }
}
