//! Contact repository
//!
//! CRUD over the persisted, insertion-ordered directory.
//!
//! The store offers no partial update, so every mutation is
//! read-entire-collection → mutate in memory → write-entire-collection.
//! The directory is read fresh at the start of every operation; nothing is
//! cached across calls, so writes made by someone else are always seen.
//!
//! Mutations hold the repository's write lock for the whole
//! read-modify-write region, so two mutations issued through the same
//! repository never interleave. Two processes writing the same key are
//! still last-write-wins.

use crate::config::DEFAULT_STORAGE_KEY;
use crate::error::{Error, Result};
use crate::model::{Contact, ContactId, Directory, IdGenerator};
use crate::traits::KvStore;
use crate::validation::validate;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Repository over one key of a [`KvStore`]
pub struct ContactRepository {
    store: Arc<dyn KvStore>,
    key: String,
    ids: IdGenerator,
    write_lock: Mutex<()>,
}

impl ContactRepository {
    /// Create a repository using the default storage key
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    /// Create a repository storing the directory under `key`
    pub fn with_key(store: Arc<dyn KvStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            ids: IdGenerator::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// Storage key in use
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the full directory
    ///
    /// Never fails: an absent key, a malformed value and a provider read
    /// failure all yield an empty directory (the last two are logged).
    pub async fn list(&self) -> Directory {
        match self.try_list().await {
            Ok(contacts) => contacts,
            Err(e) => {
                warn!(
                    "Failed to read directory from {} store, treating as empty: {}",
                    self.store.store_name(),
                    e
                );
                Directory::new()
            }
        }
    }

    /// Read the full directory, propagating provider read failures
    ///
    /// An absent key or a malformed stored value still yields an empty
    /// directory.
    pub async fn try_list(&self) -> Result<Directory> {
        let raw = match self.store.get(&self.key).await? {
            Some(raw) => raw,
            None => {
                debug!("No directory stored under '{}' yet", self.key);
                return Ok(Directory::new());
            }
        };

        match serde_json::from_str::<Directory>(&raw) {
            Ok(contacts) => {
                debug!("Loaded {} contacts", contacts.len());
                Ok(contacts)
            }
            Err(e) => {
                warn!("Stored directory under '{}' is malformed, treating as empty: {}", self.key, e);
                Ok(Directory::new())
            }
        }
    }

    /// Look up a single contact
    pub async fn get(&self, id: &ContactId) -> Result<Option<Contact>> {
        let contacts = self.try_list().await?;
        Ok(contacts.into_iter().find(|c| &c.id == id))
    }

    /// Append a new contact
    ///
    /// # Errors
    ///
    /// - `Error::Validation`: name or phone rejected
    /// - persistence errors from the store; nothing is committed
    pub async fn add(&self, name_raw: &str, phone_raw: &str) -> Result<Contact> {
        let draft = validate(name_raw, phone_raw)?;
        let _guard = self.write_lock.lock().await;

        let mut contacts = self.try_list().await?;

        // Stored ids may come from another process or an earlier run
        let floor = contacts
            .iter()
            .filter_map(|c| c.id.as_str().parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        let mut id = self.ids.next_id_above(floor);
        while contacts.iter().any(|c| c.id == id) {
            id = self.ids.next_id();
        }

        let contact = Contact {
            id,
            name: draft.name,
            phone: draft.phone,
        };
        contacts.push(contact.clone());

        self.persist(&contacts).await?;
        info!("Added contact {} ({})", contact.id, contact.name);
        Ok(contact)
    }

    /// Replace name and phone of an existing contact, keeping its position
    ///
    /// # Errors
    ///
    /// - `Error::NotFound`: no contact with `id`
    /// - `Error::Validation`: name or phone rejected
    /// - persistence errors from the store; nothing is committed
    pub async fn update(&self, id: &ContactId, name_raw: &str, phone_raw: &str) -> Result<Contact> {
        let draft = validate(name_raw, phone_raw)?;
        let _guard = self.write_lock.lock().await;

        let mut contacts = self.try_list().await?;
        let contact = contacts
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| Error::not_found(id.to_string()))?;

        contact.name = draft.name;
        contact.phone = draft.phone;
        let updated = contact.clone();

        self.persist(&contacts).await?;
        info!("Updated contact {} ({})", updated.id, updated.name);
        Ok(updated)
    }

    /// Remove a contact; removing an absent id is not an error
    pub async fn remove(&self, id: &ContactId) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut contacts = self.try_list().await?;
        let before = contacts.len();
        contacts.retain(|c| &c.id != id);

        self.persist(&contacts).await?;
        if contacts.len() < before {
            info!("Removed contact {}", id);
        } else {
            debug!("Remove of unknown contact {} was a no-op", id);
        }
        Ok(())
    }

    async fn persist(&self, contacts: &Directory) -> Result<()> {
        let json = serde_json::to_string(contacts)?;
        self.store.set(&self.key, &json).await
    }
}
