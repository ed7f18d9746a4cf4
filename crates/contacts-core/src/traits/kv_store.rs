// # Key-Value Store Trait
//
// Defines the interface for the persistence provider behind the contact
// repository.
//
// ## Purpose
//
// The provider offers exactly two primitives, `get` and `set`, over string
// values. There is no partial update: the repository always stores the whole
// serialized directory as a single value under one key.
//
// ## Implementations
//
// - In-memory (optionally with a byte quota)
// - File-based: one JSON document holding every key
//
// ## Usage
//
// ```rust,ignore
// use contacts_core::KvStore;
//
// #[tokio::main]
// async fn main() -> contacts_core::Result<()> {
//     let store = /* KvStore implementation */;
//
//     store.set("contact-app-data", "[]").await?;
//     let raw = store.get("contact-app-data").await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for persistence providers
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Failure
///
/// Both operations may fail (full disk, exhausted quota, unreadable file).
/// A failed `set` must leave the previous value in place: readers observe
/// either the old value or the new one, never a partial write.
///
/// # Responsibilities
///
/// - ✅ Store and return opaque string values
/// - ✅ Make each `set` atomic
/// - ❌ Interpret the stored value (owned by `ContactRepository`)
/// - ❌ Cache values across calls in a way that hides external writes
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`
    ///
    /// # Returns
    ///
    /// - `Ok(Some(String))`: The stored value
    /// - `Ok(None)`: Nothing stored under this key yet
    /// - `Err(Error)`: Storage error
    async fn get(&self, key: &str) -> Result<Option<String>, crate::Error>;

    /// Replace the value stored under `key`
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The value is durably stored
    /// - `Err(Error)`: Storage error; the previous value is untouched
    async fn set(&self, key: &str, value: &str) -> Result<(), crate::Error>;

    /// Short provider name used in logs (e.g. "memory", "file")
    fn store_name(&self) -> &'static str;
}

/// Helper trait for constructing stores from configuration
#[async_trait]
pub trait KvStoreFactory: Send + Sync {
    /// Create a KvStore instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: The serialized `StoreConfig` for this store
    ///
    /// # Returns
    ///
    /// A boxed KvStore trait object
    async fn create(&self, config: &serde_json::Value) -> Result<Box<dyn KvStore>, crate::Error>;
}
