//! Error types for the directory engine.
//!
//! Every engine operation returns [`DirectoryError`] on failure. Variants are
//! one-to-one with the failure kinds callers can observe; none of them are
//! retryable, and no operation applies part of its effect before failing.

use thiserror::Error;

/// Errors returned by [`Directory`](crate::Directory) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// No account is registered under the requested id.
    ///
    /// Raised only by the directory's single lookup path, so every operation
    /// reports a missing account the same way.
    #[error("account not found")]
    AccountNotFound,

    /// Account creation was rejected.
    #[error("invalid account data: {0}")]
    InvalidAccountData(InvalidAccountData),

    /// Login failed.
    ///
    /// Covers both an unknown id and a wrong credential so that callers cannot
    /// probe which accounts exist.
    #[error("invalid login or password")]
    BadCredentials,

    /// An account tried to befriend itself.
    #[error("an account cannot befriend itself")]
    SelfFriendship,

    /// An invite in the same direction is already pending.
    #[error("friend invite already pending acceptance")]
    DuplicateInvite,

    /// The two accounts are already friends.
    #[error("accounts are already friends")]
    AlreadyFriends,

    /// The profile attribute was never written.
    #[error("attribute not set")]
    AttributeNotSet,

    /// An account tried to message itself.
    #[error("an account cannot message itself")]
    SelfMessage,

    /// The inbox is empty.
    #[error("no messages")]
    NoMessages,

    /// A snapshot could not be encoded or decoded.
    #[error("persistence error: {0}")]
    Persistence(String),
}

/// Why account creation was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidAccountData {
    /// No login id was supplied.
    #[error("missing login")]
    MissingId,

    /// No credential was supplied.
    #[error("missing password")]
    MissingCredential,

    /// Another account already uses this login id.
    #[error("an account with this login already exists")]
    DuplicateId,
}

impl DirectoryError {
    /// Returns true if this error came from snapshot encoding or decoding
    /// rather than from an engine rule.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

impl From<InvalidAccountData> for DirectoryError {
    fn from(reason: InvalidAccountData) -> Self {
        Self::InvalidAccountData(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        insta::assert_snapshot!(DirectoryError::AccountNotFound, @"account not found");
        insta::assert_snapshot!(
            DirectoryError::from(InvalidAccountData::DuplicateId),
            @"invalid account data: an account with this login already exists"
        );
        insta::assert_snapshot!(DirectoryError::BadCredentials, @"invalid login or password");
        insta::assert_snapshot!(
            DirectoryError::DuplicateInvite,
            @"friend invite already pending acceptance"
        );
        insta::assert_snapshot!(
            DirectoryError::Persistence("truncated".to_string()),
            @"persistence error: truncated"
        );
    }

    #[test]
    fn only_codec_failures_are_persistence() {
        assert!(DirectoryError::Persistence(String::new()).is_persistence());
        assert!(!DirectoryError::NoMessages.is_persistence());
        assert!(!DirectoryError::AccountNotFound.is_persistence());
    }
}
