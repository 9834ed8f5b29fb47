//! Standard invariant checks.
//!
//! These invariants capture structural properties of the directory that must
//! hold after every operation, whatever the sequence.

use std::collections::HashSet;

use super::{Invariant, InvariantResult, SystemSnapshot, Violation};

/// Friendship is mutual.
///
/// If `b` is in `a`'s friends then `a` is in `b`'s friends. Acceptance writes
/// both sides in one operation, so a one-sided entry means a half-applied
/// update.
pub struct FriendshipSymmetry;

impl Invariant for FriendshipSymmetry {
    fn name(&self) -> &'static str {
        "friendship_symmetry"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for (id, account) in &state.accounts {
            for friend in &account.friends {
                let mutual = state
                    .accounts
                    .get(friend)
                    .is_some_and(|other| other.friends.iter().any(|f| f == id));
                if !mutual {
                    return Err(Violation {
                        invariant: self.name(),
                        message: format!("{id} lists {friend} as a friend but not vice versa"),
                    });
                }
            }
        }
        Ok(())
    }
}

/// A pending invite never coexists with the friendship it would create, and
/// no account relates to itself or lists anyone twice.
pub struct PendingExcludesFriends;

impl Invariant for PendingExcludesFriends {
    fn name(&self) -> &'static str {
        "pending_excludes_friends"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for (id, account) in &state.accounts {
            let violation = |message: String| Violation { invariant: self.name(), message };

            if account.friends.iter().chain(&account.pending_invites).any(|other| other == id) {
                return Err(violation(format!("{id} relates to itself")));
            }

            let friends: HashSet<&str> = account.friends.iter().map(String::as_str).collect();
            if friends.len() != account.friends.len() {
                return Err(violation(format!("{id} lists a friend twice: {:?}", account.friends)));
            }

            let pending: HashSet<&str> = account.pending_invites.iter().map(String::as_str).collect();
            if pending.len() != account.pending_invites.len() {
                return Err(violation(format!(
                    "{id} holds a duplicate invite: {:?}",
                    account.pending_invites
                )));
            }

            if let Some(both) = pending.intersection(&friends).next() {
                return Err(violation(format!("{id} has {both} both as friend and pending invite")));
            }
        }
        Ok(())
    }
}

/// Crossing invites collapse into a friendship.
///
/// `a` pending on `b` and `b` pending on `a` at the same time is unreachable:
/// the second request accepts the first.
pub struct CrossInvitesCollapsed;

impl Invariant for CrossInvitesCollapsed {
    fn name(&self) -> &'static str {
        "cross_invites_collapsed"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for (id, account) in &state.accounts {
            for inviter in &account.pending_invites {
                let crossed = state
                    .accounts
                    .get(inviter)
                    .is_some_and(|other| other.pending_invites.iter().any(|p| p == id));
                if crossed {
                    return Err(Violation {
                        invariant: self.name(),
                        message: format!("{id} and {inviter} have invited each other"),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Every friend and inviter id names a registered account.
pub struct ReferencesResolve;

impl Invariant for ReferencesResolve {
    fn name(&self) -> &'static str {
        "references_resolve"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for (id, account) in &state.accounts {
            if let Some(dangling) = account
                .friends
                .iter()
                .chain(&account.pending_invites)
                .find(|other| !state.accounts.contains_key(*other))
            {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("{id} references unknown account {dangling}"),
                });
            }
        }
        Ok(())
    }
}

/// Every session belongs to a registered account and was minted below the
/// current counter.
pub struct SessionsResolve;

impl Invariant for SessionsResolve {
    fn name(&self) -> &'static str {
        "sessions_resolve"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for (token, owner) in &state.sessions {
            if !state.accounts.contains_key(owner) {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("session {token} belongs to unknown account {owner}"),
                });
            }

            let minted_below_counter =
                token.parse::<u64>().is_ok_and(|value| value < state.next_session_counter);
            if !minted_below_counter {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "session {token} was not minted below counter {}",
                        state.next_session_counter
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invariants::AccountSnapshot;

    fn pair(a: AccountSnapshot, b: AccountSnapshot) -> SystemSnapshot {
        let mut state = SystemSnapshot::empty();
        state.add_account("a", a);
        state.add_account("b", b);
        state
    }

    #[test]
    fn one_sided_friendship_detected() {
        let state = pair(AccountSnapshot::new().with_friends(["b"]), AccountSnapshot::new());

        let violation = FriendshipSymmetry.check(&state).unwrap_err();
        insta::assert_snapshot!(violation, @"friendship_symmetry: a lists b as a friend but not vice versa");
    }

    #[test]
    fn mutual_friendship_passes() {
        let state = pair(
            AccountSnapshot::new().with_friends(["b"]),
            AccountSnapshot::new().with_friends(["a"]),
        );

        assert!(FriendshipSymmetry.check(&state).is_ok());
        assert!(PendingExcludesFriends.check(&state).is_ok());
    }

    #[test]
    fn friend_and_pending_detected() {
        let state = pair(
            AccountSnapshot::new().with_friends(["b"]).with_pending(["b"]),
            AccountSnapshot::new().with_friends(["a"]),
        );

        let violation = PendingExcludesFriends.check(&state).unwrap_err();
        insta::assert_snapshot!(violation, @"pending_excludes_friends: a has b both as friend and pending invite");
    }

    #[test]
    fn self_reference_detected() {
        let state = pair(AccountSnapshot::new().with_pending(["a"]), AccountSnapshot::new());

        assert!(PendingExcludesFriends.check(&state).is_err());
    }

    #[test]
    fn crossing_invites_detected() {
        let state = pair(
            AccountSnapshot::new().with_pending(["b"]),
            AccountSnapshot::new().with_pending(["a"]),
        );

        assert!(CrossInvitesCollapsed.check(&state).is_err());
    }

    #[test]
    fn dangling_reference_detected() {
        let state = pair(AccountSnapshot::new().with_pending(["ghost"]), AccountSnapshot::new());

        let violation = ReferencesResolve.check(&state).unwrap_err();
        insta::assert_snapshot!(violation, @"references_resolve: a references unknown account ghost");
    }

    #[test]
    fn session_checks() {
        let mut state = pair(AccountSnapshot::new(), AccountSnapshot::new());
        state.next_session_counter = 3;
        state.add_session("1", "a");
        state.add_session("2", "b");
        assert!(SessionsResolve.check(&state).is_ok());

        let mut unknown_owner = state.clone();
        unknown_owner.add_session("2", "ghost");
        assert!(SessionsResolve.check(&unknown_owner).is_err());

        let mut future_token = state;
        future_token.add_session("3", "a");
        assert!(SessionsResolve.check(&future_token).is_err());
    }
}
