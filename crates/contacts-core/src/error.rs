//! Error types for the contact directory
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for directory operations
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a name/phone pair is rejected before it reaches storage
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is empty after trimming
    #[error("name required")]
    NameRequired,

    /// Phone has fewer than three digits once non-digits are stripped
    #[error("phone must contain at least 3 digits")]
    PhoneTooShort,
}

/// Core error type for the contact directory
#[derive(Error, Debug)]
pub enum Error {
    /// Rejected input (recovered by the controller)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Contact not found
    #[error("contact not found: {0}")]
    NotFound(String),

    /// Persistence provider read/write failure
    #[error("storage error: {0}")]
    Persistence(String),

    /// Persistence provider ran out of space
    #[error("storage quota exceeded: {requested} bytes requested, limit is {limit}")]
    QuotaExceeded {
        /// Total bytes the store would hold after the write
        requested: usize,
        /// Configured quota in bytes
        limit: usize,
    },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error came from the storage layer
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Self::Persistence(_) | Self::QuotaExceeded { .. } | Self::Json(_)
        )
    }

    /// Whether the error is an unknown contact id
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
