//! String-level facade over the directory engine.
//!
//! [`Service`] pairs a [`Directory`] with a [`SnapshotStore`]. State is loaded
//! once in [`Service::open`] and written back by [`Service::save`] or
//! [`Service::shutdown`]; no operation in between touches the store.

use kinship_core::{Directory, FriendRequestOutcome};
use tracing::{info, warn};

use crate::{error::ServiceError, storage::SnapshotStore};

/// Render an id sequence as `{a,b,c}`, or `{}` when empty.
pub fn render_id_set<I, T>(ids: I) -> String
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut out = String::from("{");
    for (i, id) in ids.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(id.as_ref());
    }
    out.push('}');
    out
}

/// Directory plus the store it is loaded from and saved to.
pub struct Service<S: SnapshotStore> {
    directory: Directory,
    store: S,
}

impl<S: SnapshotStore> Service<S> {
    /// Load the stored snapshot, or start empty if the store has none.
    ///
    /// # Errors
    ///
    /// - `ServiceError::Storage` if the store cannot be read
    /// - `ServiceError::Directory` (persistence) if the snapshot is corrupt
    pub fn open(store: S) -> Result<Self, ServiceError> {
        let snapshot = store.load_snapshot().inspect_err(|err| {
            warn!(error = %err, "failed to read directory snapshot");
        })?;

        let directory = match snapshot {
            Some(bytes) => {
                let directory = Directory::import(&bytes).inspect_err(|err| {
                    warn!(error = %err, "rejected stored directory snapshot");
                })?;
                info!(
                    accounts = directory.account_count(),
                    sessions = directory.sessions().len(),
                    "directory loaded"
                );
                directory
            },
            None => {
                info!("no stored directory, starting empty");
                Directory::new()
            },
        };

        Ok(Self { directory, store })
    }

    /// Read-only view of the engine.
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Store this service saves to.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register an account. `None` stands for a missing login or password.
    pub fn create_account(
        &mut self,
        id: Option<&str>,
        credential: Option<&str>,
        display_name: &str,
    ) -> Result<(), ServiceError> {
        Ok(self.directory.create_account(id, credential, display_name)?)
    }

    /// Open a session and return the account id.
    pub fn login(&mut self, id: &str, credential: &str) -> Result<String, ServiceError> {
        Ok(self.directory.login(id, credential)?)
    }

    /// Read a profile attribute.
    pub fn get_attribute(&self, id: &str, name: &str) -> Result<String, ServiceError> {
        Ok(self.directory.get_attribute(id, name)?.to_owned())
    }

    /// Write a profile attribute.
    pub fn set_attribute(&mut self, id: &str, name: &str, value: &str) -> Result<(), ServiceError> {
        Ok(self.directory.set_attribute(id, name, value)?)
    }

    /// Invite `friend`, or accept their pending invite.
    pub fn add_friend(
        &mut self,
        id: &str,
        friend: &str,
    ) -> Result<FriendRequestOutcome, ServiceError> {
        Ok(self.directory.request_friendship(id, friend)?)
    }

    /// Whether `friend` is among `id`'s friends.
    pub fn is_friend(&self, id: &str, friend: &str) -> Result<bool, ServiceError> {
        Ok(self.directory.are_friends(id, friend)?)
    }

    /// Friends of `id` rendered as `{a,b}`.
    pub fn friends(&self, id: &str) -> Result<String, ServiceError> {
        Ok(render_id_set(self.directory.list_friends(id)?))
    }

    /// Deliver a message to `recipient`'s inbox.
    pub fn send_message(
        &mut self,
        sender: &str,
        recipient: &str,
        body: &str,
    ) -> Result<(), ServiceError> {
        Ok(self.directory.send_message(sender, recipient, body)?)
    }

    /// Pop the oldest message from `id`'s inbox.
    pub fn read_message(&mut self, id: &str) -> Result<String, ServiceError> {
        Ok(self.directory.read_message(id)?)
    }

    /// Clear the in-memory directory. The stored snapshot is untouched until
    /// the next save.
    pub fn reset(&mut self) {
        self.directory.reset();
    }

    /// Write the current directory to the store.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if encoding or the store write fails. The
    /// in-memory state is unchanged either way.
    pub fn save(&self) -> Result<(), ServiceError> {
        let bytes = self.directory.export()?;
        self.store.store_snapshot(&bytes).inspect_err(|err| {
            warn!(error = %err, "failed to write directory snapshot");
        })?;

        info!(accounts = self.directory.account_count(), bytes = bytes.len(), "directory saved");
        Ok(())
    }

    /// Save and release the service.
    pub fn shutdown(self) -> Result<(), ServiceError> {
        self.save()
    }
}
