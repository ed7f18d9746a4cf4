//! Configuration types for the contact directory
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

/// Key the directory is stored under when none is configured
pub const DEFAULT_STORAGE_KEY: &str = "contact-app-data";

/// Main directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Key the serialized directory is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Persistence provider configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Optional controller settings
    #[serde(default)]
    pub controller: ControllerConfig,
}

impl DirectoryConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            storage_key: default_storage_key(),
            store: StoreConfig::default(),
            controller: ControllerConfig::default(),
        }
    }

    /// Use a different store
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    /// Use a different storage key
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.storage_key.trim().is_empty() {
            return Err(crate::Error::config("Storage key cannot be empty"));
        }

        self.store.validate()?;
        self.controller.validate()?;

        Ok(())
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Persistence provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// In-memory store (not persistent)
    Memory {
        /// Optional size limit in bytes
        #[serde(default)]
        quota_bytes: Option<usize>,
    },

    /// File-based store
    File {
        /// Path to the store file
        path: String,
    },

    /// Custom store
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl StoreConfig {
    /// Validate the store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            StoreConfig::Memory { quota_bytes } => {
                if *quota_bytes == Some(0) {
                    return Err(crate::Error::config("Memory store quota must be > 0"));
                }
                Ok(())
            }
            StoreConfig::File { path } => {
                if path.trim().is_empty() {
                    return Err(crate::Error::config("File store path cannot be empty"));
                }
                Ok(())
            }
            StoreConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config("Custom store factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(crate::Error::config("Custom store config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the store type name used for registry lookup
    pub fn type_name(&self) -> &str {
        match self {
            StoreConfig::Memory { .. } => "memory",
            StoreConfig::File { .. } => "file",
            StoreConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Memory { quota_bytes: None }
    }
}

/// Controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Capacity of the render model channel
    ///
    /// When full, new render models are dropped (with a warning log).
    /// The model is still returned to the direct caller.
    ///
    /// Default: 64 models
    #[serde(default = "default_render_channel_capacity")]
    pub render_channel_capacity: usize,
}

impl ControllerConfig {
    /// Validate the controller configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.render_channel_capacity == 0 {
            return Err(crate::Error::config("Render channel capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            render_channel_capacity: default_render_channel_capacity(),
        }
    }
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_render_channel_capacity() -> usize {
    64
}
