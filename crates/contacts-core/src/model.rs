//! Contact records and identifier generation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// Opaque contact identifier
///
/// Serialized as a plain JSON string. Assigned once by the repository and
/// never changed or reused afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    /// Wrap an existing identifier (e.g. one typed by the user)
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContactId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ContactId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Stable identifier
    pub id: ContactId,
    /// Display name, stored trimmed
    pub name: String,
    /// Phone number as entered (surrounding whitespace trimmed)
    pub phone: String,
}

impl Contact {
    /// Avatar initial shown next to the name: first character of the
    /// trimmed name, upper-cased, or `?` when the name is blank.
    pub fn initial(&self) -> String {
        match self.name.trim().chars().next() {
            Some(c) => c.to_uppercase().collect(),
            None => "?".to_string(),
        }
    }
}

/// The full ordered collection of contacts at a point in time
pub type Directory = Vec<Contact>;

/// Last id handed out anywhere in the process
static LAST_ISSUED: AtomicI64 = AtomicI64::new(0);

/// Millisecond-timestamp id source with monotonic disambiguation
///
/// All generators share one process-wide counter, so every id handed out is
/// strictly greater than the previous one, across repositories and even when
/// the clock stalls or steps backwards.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdGenerator;

impl IdGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Issue the next identifier
    pub fn next_id(&self) -> ContactId {
        self.next_id_above(0)
    }

    /// Issue the next identifier, strictly greater than `floor`
    pub fn next_id_above(&self, floor: i64) -> ContactId {
        let now = chrono::Utc::now().timestamp_millis();
        let mut prev = LAST_ISSUED.load(Ordering::SeqCst);
        loop {
            let candidate = now.max(prev + 1).max(floor + 1);
            match LAST_ISSUED.compare_exchange(prev, candidate, Ordering::SeqCst, Ordering::SeqCst) {
                Ok(_) => return ContactId(candidate.to_string()),
                Err(actual) => prev = actual,
            }
        }
    }
}
