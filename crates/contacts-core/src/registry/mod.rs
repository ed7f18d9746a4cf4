//! Plugin-based store registry
//!
//! The registry allows persistence providers to be registered dynamically
//! at runtime, avoiding hardcoded if-else chains in the binaries.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use contacts_core::registry::StoreRegistry;
//! use contacts_core::config::StoreConfig;
//!
//! // Registry with the memory and file stores
//! let registry = StoreRegistry::with_builtin_stores();
//!
//! // Register a custom backend
//! registry.register_store("sqlite", Box::new(SqliteStoreFactory));
//!
//! // Create store from config
//! let store = registry
//!     .create_store(&StoreConfig::File { path: "contacts.json".into() })
//!     .await?;
//! ```

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::store::{FileKvStoreFactory, MemoryKvStoreFactory};
use crate::traits::{KvStore, KvStoreFactory};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Store registry for plugin-based persistence provider creation
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct StoreRegistry {
    /// Registered store factories
    stores: RwLock<HashMap<String, Arc<dyn KvStoreFactory>>>,
}

impl StoreRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the `memory` and `file` stores registered
    pub fn with_builtin_stores() -> Self {
        let registry = Self::new();
        registry.register_store("memory", Box::new(MemoryKvStoreFactory));
        registry.register_store("file", Box::new(FileKvStoreFactory));
        registry
    }

    /// Register a store factory
    ///
    /// # Parameters
    ///
    /// - `name`: Store type name (e.g., "file", "memory")
    /// - `factory`: Factory object for creating store instances
    pub fn register_store(&self, name: impl Into<String>, factory: Box<dyn KvStoreFactory>) {
        let mut stores = self.stores.write().unwrap_or_else(PoisonError::into_inner);
        stores.insert(name.into(), Arc::from(factory));
    }

    /// Create a store from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn KvStore>)`: Created store instance
    /// - `Err(Error)`: If store type is not registered or creation fails
    pub async fn create_store(&self, config: &StoreConfig) -> Result<Box<dyn KvStore>> {
        config.validate()?;
        let store_type = config.type_name();

        let factory = {
            let stores = self.stores.read().unwrap_or_else(PoisonError::into_inner);
            stores
                .get(store_type)
                .ok_or_else(|| Error::config(format!("Unknown store type: {}", store_type)))?
                .clone()
        };

        // Custom factories receive their own config block
        let config_json = match config {
            StoreConfig::Custom { config, .. } => config.clone(),
            _ => serde_json::to_value(config)?,
        };

        tracing::debug!("Creating '{}' store", store_type);
        factory.create(&config_json).await
    }

    /// List all registered store types
    pub fn list_stores(&self) -> Vec<String> {
        let stores = self.stores.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = stores.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a store type is registered
    pub fn has_store(&self, name: &str) -> bool {
        let stores = self.stores.read().unwrap_or_else(PoisonError::into_inner);
        stores.contains_key(name)
    }
}
