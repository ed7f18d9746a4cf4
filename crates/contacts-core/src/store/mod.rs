// # Store Implementations
//
// This module provides implementations of the KvStore trait for
// different persistence strategies.

pub mod file;
pub mod memory;

pub use file::{FileKvStore, FileKvStoreFactory};
pub use memory::{MemoryKvStore, MemoryKvStoreFactory};
