//! Test doubles and common utilities for contract tests
//!
//! This module provides a controllable persistence provider that counts
//! calls and can be told to fail, plus helpers to wire it up.

#![allow(dead_code)]

use contacts_core::config::{ControllerConfig, DEFAULT_STORAGE_KEY};
use contacts_core::error::{Error, Result};
use contacts_core::traits::KvStore;
use contacts_core::{Contact, ContactRepository, DirectoryController, RenderModel};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::mpsc;

/// A KvStore that tracks calls and fails on demand
pub struct MockKvStore {
    /// Call counter for get()
    get_call_count: Arc<AtomicUsize>,
    /// Call counter for set()
    set_call_count: Arc<AtomicUsize>,
    /// When set, get() fails
    fail_reads: Arc<AtomicBool>,
    /// When set, set() fails
    fail_writes: Arc<AtomicBool>,
    /// Stored values
    state: Arc<std::sync::Mutex<HashMap<String, String>>>,
}

impl MockKvStore {
    pub fn new() -> Self {
        Self {
            get_call_count: Arc::new(AtomicUsize::new(0)),
            set_call_count: Arc::new(AtomicUsize::new(0)),
            fail_reads: Arc::new(AtomicBool::new(false)),
            fail_writes: Arc::new(AtomicBool::new(false)),
            state: Arc::new(std::sync::Mutex::new(HashMap::new())),
        }
    }

    /// Create a new MockKvStore that shares counters and data with an existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            get_call_count: Arc::clone(&other.get_call_count),
            set_call_count: Arc::clone(&other.set_call_count),
            fail_reads: Arc::clone(&other.fail_reads),
            fail_writes: Arc::clone(&other.fail_writes),
            state: Arc::clone(&other.state),
        }
    }

    /// Get the number of times get() was called
    pub fn get_call_count(&self) -> usize {
        self.get_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times set() was called
    pub fn set_call_count(&self) -> usize {
        self.set_call_count.load(Ordering::SeqCst)
    }

    /// Make every following get() fail (or succeed again)
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every following set() fail (or succeed again)
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw value under a key, bypassing counters and failures
    pub fn raw(&self, key: &str) -> Option<String> {
        self.state.lock().unwrap().get(key).cloned()
    }

    /// Overwrite a key directly, as another tab or process would
    pub fn put_raw(&self, key: &str, value: &str) {
        self.state
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    /// Decoded directory under the default key
    pub fn stored_directory(&self) -> Vec<Contact> {
        self.raw(DEFAULT_STORAGE_KEY)
            .map(|raw| serde_json::from_str(&raw).expect("stored directory is valid JSON"))
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl KvStore for MockKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::persistence("simulated read failure"));
        }
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::persistence("simulated write failure"));
        }
        self.put_raw(key, value);
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "mock"
    }
}

/// Repository over a handle sharing state with `store`
pub fn repository_over(store: &MockKvStore) -> Arc<ContactRepository> {
    Arc::new(ContactRepository::new(Arc::new(
        MockKvStore::sharing_state_with(store),
    )))
}

/// Controller with default settings over `repository`
pub fn controller_over(
    repository: Arc<ContactRepository>,
) -> (DirectoryController, mpsc::Receiver<RenderModel>) {
    DirectoryController::new(repository, &ControllerConfig::default())
        .expect("controller construction succeeds")
}

/// Names in directory order
pub fn names(model: &RenderModel) -> Vec<&str> {
    model.contacts.iter().map(|c| c.name.as_str()).collect()
}
