//! Core traits for the contact directory
//!
//! - [`KvStore`]: Key-value persistence provider used by the repository

pub mod kv_store;

pub use kv_store::{KvStore, KvStoreFactory};
