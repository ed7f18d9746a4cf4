// # contacts-core
//
// Core library for the contact directory.
//
// ## Architecture Overview
//
// - **KvStore**: Trait for the key-value persistence provider
// - **ContactRepository**: CRUD over the persisted, ordered directory
// - **DirectoryController**: Edit session, validation and render models
// - **StoreRegistry**: Plugin-based registry for persistence providers
//
// ## Design Principles
//
// 1. **Injected Persistence**: The store is passed in, never a global
// 2. **Fresh Reads**: Every repository operation re-reads the directory
// 3. **Whole-Value Writes**: Read-modify-write of the full collection,
//    serialized within the process
// 4. **Explicit Edit State**: The edit target is a tagged variant that is
//    reconciled after every load
// 5. **Library-First**: The CLI is a thin layer over this crate

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod registry;
pub mod repository;
pub mod store;
pub mod traits;
pub mod validation;

// Re-export core types for convenience
pub use config::{ControllerConfig, DirectoryConfig, StoreConfig};
pub use controller::{DirectoryController, EditSession, FormState, Intent, RenderModel};
pub use error::{Error, Result, ValidationError};
pub use model::{Contact, ContactId, Directory};
pub use registry::StoreRegistry;
pub use repository::ContactRepository;
pub use store::{FileKvStore, MemoryKvStore};
pub use traits::KvStore;
