//! Operations for model-based testing.
//!
//! Operations represent every mutating or observable action on a directory.
//! They are generated randomly (by proptest or from fuzzer bytes) and applied
//! to both the model and the real engine.

use arbitrary::Arbitrary;
use kinship_core::{Directory, DirectoryError, FriendRequestOutcome, InvalidAccountData};

/// Account index into a fixed universe of ids.
pub type AccountIndex = u8;

/// Number of distinct account ids operations can name.
///
/// Small enough that random sequences hit existing accounts, collisions and
/// friend cycles often.
pub const ACCOUNT_UNIVERSE: u8 = 6;

const ATTRIBUTE_NAMES: [&str; 4] = ["name", "login", "city", "bio"];

/// Account id for an index. Indices wrap around [`ACCOUNT_UNIVERSE`].
pub fn account_id(index: AccountIndex) -> String {
    format!("user{}", index % ACCOUNT_UNIVERSE)
}

pub(crate) fn display_name(index: AccountIndex) -> String {
    format!("User {}", index % ACCOUNT_UNIVERSE)
}

pub(crate) fn credential(index: AccountIndex) -> String {
    format!("pw{}", index % ACCOUNT_UNIVERSE)
}

pub(crate) fn attribute_name(key: u8) -> &'static str {
    ATTRIBUTE_NAMES[usize::from(key) % ATTRIBUTE_NAMES.len()]
}

/// Operations that can be applied to a directory.
#[derive(Debug, Clone, PartialEq, Eq, Arbitrary)]
pub enum Operation {
    /// Register an account, optionally with the id or credential missing.
    CreateAccount {
        /// Account to create.
        account: AccountIndex,
        /// Pass no id.
        omit_id: bool,
        /// Pass no credential.
        omit_credential: bool,
    },

    /// Log in with the right or a wrong credential.
    Login {
        /// Account logging in.
        account: AccountIndex,
        /// Use the account's real credential.
        correct: bool,
    },

    /// Write a profile attribute.
    SetAttribute {
        /// Account to edit.
        account: AccountIndex,
        /// Attribute selector (includes the derived `name` and `login`).
        key: u8,
        /// Value seed.
        value: u8,
    },

    /// Read a profile attribute.
    GetAttribute {
        /// Account to read.
        account: AccountIndex,
        /// Attribute selector.
        key: u8,
    },

    /// Invite, or accept an invite.
    RequestFriendship {
        /// Requester.
        from: AccountIndex,
        /// Other account.
        to: AccountIndex,
    },

    /// Deliver a message.
    SendMessage {
        /// Sender.
        from: AccountIndex,
        /// Recipient.
        to: AccountIndex,
        /// Body seed.
        body: u8,
    },

    /// Pop the oldest message.
    ReadMessage {
        /// Inbox owner.
        account: AccountIndex,
    },

    /// Clear the whole directory.
    Reset,
}

/// Result of applying an operation.
///
/// Used to compare model and real system behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    /// Operation succeeded with nothing to report.
    Ok,

    /// Operation succeeded and produced a value.
    Value(String),

    /// Operation failed with an expected error.
    Error(OperationError),
}

impl OperationResult {
    /// Check whether the operation succeeded.
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Error(_))
    }
}

/// Expected errors, one per engine failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationError {
    /// Account lookup failed.
    AccountNotFound,
    /// No id supplied on creation.
    MissingId,
    /// No credential supplied on creation.
    MissingCredential,
    /// Id already registered.
    DuplicateId,
    /// Unknown id or wrong credential.
    BadCredentials,
    /// Self-invite.
    SelfFriendship,
    /// Same-direction invite already pending.
    DuplicateInvite,
    /// Pair already friends.
    AlreadyFriends,
    /// Attribute never written.
    AttributeNotSet,
    /// Self-message.
    SelfMessage,
    /// Empty inbox.
    NoMessages,
    /// Snapshot failure (never produced by operations).
    Persistence,
}

impl From<DirectoryError> for OperationError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::AccountNotFound => Self::AccountNotFound,
            DirectoryError::InvalidAccountData(InvalidAccountData::MissingId) => Self::MissingId,
            DirectoryError::InvalidAccountData(InvalidAccountData::MissingCredential) => {
                Self::MissingCredential
            },
            DirectoryError::InvalidAccountData(InvalidAccountData::DuplicateId) => {
                Self::DuplicateId
            },
            DirectoryError::BadCredentials => Self::BadCredentials,
            DirectoryError::SelfFriendship => Self::SelfFriendship,
            DirectoryError::DuplicateInvite => Self::DuplicateInvite,
            DirectoryError::AlreadyFriends => Self::AlreadyFriends,
            DirectoryError::AttributeNotSet => Self::AttributeNotSet,
            DirectoryError::SelfMessage => Self::SelfMessage,
            DirectoryError::NoMessages => Self::NoMessages,
            DirectoryError::Persistence(_) => Self::Persistence,
        }
    }
}

fn unit(result: Result<(), DirectoryError>) -> OperationResult {
    match result {
        Ok(()) => OperationResult::Ok,
        Err(err) => OperationResult::Error(err.into()),
    }
}

fn value(result: Result<String, DirectoryError>) -> OperationResult {
    match result {
        Ok(value) => OperationResult::Value(value),
        Err(err) => OperationResult::Error(err.into()),
    }
}

/// Rendering of a friend request outcome shared by model and engine.
pub(crate) fn outcome_label(outcome: FriendRequestOutcome) -> String {
    match outcome {
        FriendRequestOutcome::Invited => "invited".to_owned(),
        FriendRequestOutcome::Accepted => "accepted".to_owned(),
    }
}

impl Operation {
    /// Apply this operation to a real directory.
    pub fn apply_to(&self, directory: &mut Directory) -> OperationResult {
        match *self {
            Self::CreateAccount { account, omit_id, omit_credential } => {
                let id = account_id(account);
                let credential = credential(account);
                unit(directory.create_account(
                    (!omit_id).then_some(id.as_str()),
                    (!omit_credential).then_some(credential.as_str()),
                    &display_name(account),
                ))
            },
            Self::Login { account, correct } => {
                let credential = if correct { credential(account) } else { "wrong".to_owned() };
                value(directory.login(&account_id(account), &credential))
            },
            Self::SetAttribute { account, key, value: seed } => unit(directory.set_attribute(
                &account_id(account),
                attribute_name(key),
                &attribute_value(seed),
            )),
            Self::GetAttribute { account, key } => {
                let found = directory.get_attribute(&account_id(account), attribute_name(key));
                value(found.map(str::to_owned))
            },
            Self::RequestFriendship { from, to } => value(
                directory.request_friendship(&account_id(from), &account_id(to)).map(outcome_label),
            ),
            Self::SendMessage { from, to, body } => {
                let (from, to) = (account_id(from), account_id(to));
                unit(directory.send_message(&from, &to, &message_body(body)))
            },
            Self::ReadMessage { account } => value(directory.read_message(&account_id(account))),
            Self::Reset => {
                directory.reset();
                OperationResult::Ok
            },
        }
    }
}

pub(crate) fn attribute_value(seed: u8) -> String {
    format!("value-{seed}")
}

pub(crate) fn message_body(seed: u8) -> String {
    format!("message-{seed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_wrap_around_universe() {
        assert_eq!(account_id(0), "user0");
        assert_eq!(account_id(ACCOUNT_UNIVERSE), "user0");
        assert_eq!(account_id(ACCOUNT_UNIVERSE + 1), "user1");
    }

    #[test]
    fn apply_to_reports_engine_errors() {
        let mut directory = Directory::new();

        let create = Operation::CreateAccount { account: 1, omit_id: false, omit_credential: false };
        assert_eq!(create.apply_to(&mut directory), OperationResult::Ok);
        assert_eq!(
            create.apply_to(&mut directory),
            OperationResult::Error(OperationError::DuplicateId)
        );

        let login = Operation::Login { account: 1, correct: true };
        assert_eq!(login.apply_to(&mut directory), OperationResult::Value("user1".to_owned()));

        let read = Operation::ReadMessage { account: 2 };
        assert_eq!(
            read.apply_to(&mut directory),
            OperationResult::Error(OperationError::AccountNotFound)
        );
    }
}
