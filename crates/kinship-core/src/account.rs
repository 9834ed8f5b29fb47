//! Registered accounts and their profile attributes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{friends::FriendGraph, mailbox::Mailbox};

/// Attribute name that reads the display name.
pub const NAME_ATTRIBUTE: &str = "name";

/// Attribute name that reads the login id.
pub const LOGIN_ATTRIBUTE: &str = "login";

/// A registered identity.
///
/// The id never changes after creation. Everything else mutates through the
/// [`Directory`](crate::Directory); callers outside the crate only ever see
/// `&Account`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    id: String,
    display_name: String,
    credential: String,
    attributes: BTreeMap<String, String>,
    graph: FriendGraph,
    inbox: Mailbox,
}

impl Account {
    pub(crate) fn new(id: &str, credential: &str, display_name: &str) -> Self {
        Self {
            id: id.to_owned(),
            display_name: display_name.to_owned(),
            credential: credential.to_owned(),
            attributes: BTreeMap::new(),
            graph: FriendGraph::new(),
            inbox: Mailbox::new(),
        }
    }

    /// Login id and lookup key.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name given at creation.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Exact-match credential check.
    pub fn credential_matches(&self, credential: &str) -> bool {
        self.credential == credential
    }

    /// Read a profile attribute.
    ///
    /// [`NAME_ATTRIBUTE`] and [`LOGIN_ATTRIBUTE`] are derived from the
    /// identity fields; any other name is looked up in the free-form map.
    /// `None` if the attribute was never written.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            NAME_ATTRIBUTE => Some(&self.display_name),
            LOGIN_ATTRIBUTE => Some(&self.id),
            _ => self.attributes.get(name).map(String::as_str),
        }
    }

    /// Free-form attributes (excludes the derived `name`/`login`).
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Friends and pending invites.
    pub fn graph(&self) -> &FriendGraph {
        &self.graph
    }

    /// Unread inbound messages.
    pub fn inbox(&self) -> &Mailbox {
        &self.inbox
    }

    pub(crate) fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_owned(), value.to_owned());
    }

    pub(crate) fn graph_mut(&mut self) -> &mut FriendGraph {
        &mut self.graph
    }

    pub(crate) fn inbox_mut(&mut self) -> &mut Mailbox {
        &mut self.inbox
    }
}
