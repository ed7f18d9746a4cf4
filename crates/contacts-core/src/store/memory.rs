// # Memory Store
//
// In-memory implementation of KvStore.
//
// ## Purpose
//
// Provides a simple, fast store that doesn't persist across restarts.
// Cloned handles share the same map, so a test (or a second "tab") can
// modify the data behind the repository's back.
//
// ## Quota
//
// An optional byte quota mimics the size limit of browser-local storage.
// The size of a store is the sum of the byte lengths of every key and
// value. A `set` that would exceed the quota fails with
// `Error::QuotaExceeded` and leaves the previous value in place.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::StoreConfig;
use crate::traits::kv_store::{KvStore, KvStoreFactory};
use crate::Error;

/// In-memory key-value store
///
/// # Example
///
/// ```rust,no_run
/// use contacts_core::store::MemoryKvStore;
/// use contacts_core::traits::KvStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryKvStore::new();
///
///     store.set("contact-app-data", "[]").await?;
///     assert_eq!(store.get("contact-app-data").await?, Some("[]".to_string()));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryKvStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
    quota_bytes: Option<usize>,
}

impl MemoryKvStore {
    /// Create a new empty store without a quota
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            quota_bytes: None,
        }
    }

    /// Create a new empty store limited to `quota_bytes`
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Get the number of keys in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Total bytes currently held (keys + values)
    pub async fn used_bytes(&self) -> usize {
        let guard = self.inner.read().await;
        Self::footprint(&guard)
    }

    /// Remove every key
    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }

    fn footprint(map: &HashMap<String, String>) -> usize {
        map.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl Default for MemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().await;

        if let Some(limit) = self.quota_bytes {
            let current = Self::footprint(&guard);
            let replaced = guard.get(key).map_or(0, |old| key.len() + old.len());
            let requested = current - replaced + key.len() + value.len();
            if requested > limit {
                return Err(Error::QuotaExceeded { requested, limit });
            }
        }

        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}

/// Builds a [`MemoryKvStore`] from `StoreConfig::Memory`
#[derive(Debug, Default)]
pub struct MemoryKvStoreFactory;

#[async_trait]
impl KvStoreFactory for MemoryKvStoreFactory {
    async fn create(&self, config: &serde_json::Value) -> Result<Box<dyn KvStore>, Error> {
        match serde_json::from_value::<StoreConfig>(config.clone())? {
            StoreConfig::Memory { quota_bytes: Some(limit) } => {
                Ok(Box::new(MemoryKvStore::with_quota(limit)))
            }
            StoreConfig::Memory { quota_bytes: None } => Ok(Box::new(MemoryKvStore::new())),
            other => Err(Error::config(format!(
                "memory store factory cannot build a '{}' store",
                other.type_name()
            ))),
        }
    }
}
