//! Per-account inbound message queue.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// FIFO queue of message bodies delivered to one account.
///
/// Bodies are opaque strings; no validation is applied on delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mailbox {
    messages: VecDeque<String>,
}

impl Mailbox {
    /// Create an empty mailbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of unread messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if there are no unread messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Unread messages, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.messages.iter().map(String::as_str)
    }

    pub(crate) fn push(&mut self, body: String) {
        self.messages.push_back(body);
    }

    pub(crate) fn pop(&mut self) -> Option<String> {
        self.messages.pop_front()
    }
}
