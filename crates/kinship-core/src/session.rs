//! Login session tokens.
//!
//! Tokens are minted from a counter and recorded against the account that
//! logged in. Nothing else in the engine looks a token up: callers identify
//! the current session by account id. The table exists so every successful
//! login leaves a unique, auditable trace.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Counter value the first token is minted from.
pub const FIRST_SESSION_COUNTER: u64 = 1;

/// Issues login tokens and remembers which account each belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRegistry {
    /// Token → account id
    sessions: BTreeMap<String, String>,
    /// Next counter value to mint a token from
    next_counter: u64,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { sessions: BTreeMap::new(), next_counter: FIRST_SESSION_COUNTER }
    }

    /// Mint a token for `account_id` and record it.
    ///
    /// The token is the decimal rendering of the counter, which then advances.
    pub(crate) fn issue(&mut self, account_id: &str) -> String {
        let token = self.next_counter.to_string();
        self.sessions.insert(token.clone(), account_id.to_owned());
        // Import refuses u64::MAX, so a live registry always has one more to mint.
        self.next_counter = self.next_counter.saturating_add(1);
        token
    }

    /// Account a token was issued to. `None` if the token was never issued.
    pub fn owner(&self, token: &str) -> Option<&str> {
        self.sessions.get(token).map(String::as_str)
    }

    /// Iterate `(token, account_id)` pairs in lexicographic token order.
    ///
    /// Tokens compare as strings, so `"10"` sorts before `"2"`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.sessions.iter().map(|(token, id)| (token.as_str(), id.as_str()))
    }

    /// Number of tokens issued since the last reset.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if no tokens have been issued since the last reset.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Counter value the next token will be minted from.
    pub fn next_counter(&self) -> u64 {
        self.next_counter
    }

    #[cfg(test)]
    pub(crate) fn resumed_at(next_counter: u64) -> Self {
        Self { sessions: BTreeMap::new(), next_counter }
    }

    pub(crate) fn clear(&mut self) {
        self.sessions.clear();
        self.next_counter = FIRST_SESSION_COUNTER;
    }
}
