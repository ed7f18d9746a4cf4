// # File Store
//
// File-based implementation of KvStore with crash recovery.
//
// ## Purpose
//
// Persists every key in one JSON document so the directory survives
// restarts. The file is read on every `get`, so edits made by another
// process (or by hand) are picked up on the next operation.
//
// ## Crash Recovery
//
// - Atomic writes: Uses write-then-rename for atomicity
// - Corruption detection: Validates JSON on load
// - Automatic backup: Keeps .backup of last known good document
// - Recovery: Falls back to backup if corruption detected
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "entries": {
//     "contact-app-data": "[{\"id\":\"1700000000000\",\"name\":\"Ann\",\"phone\":\"555-0101\"}]"
//   }
// }
// ```

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::config::StoreConfig;
use crate::traits::kv_store::{KvStore, KvStoreFactory};
use crate::Error;

/// Store file format version
/// Used for future migration if format changes
const STORE_FILE_VERSION: &str = "1.0";

/// File-based key-value store with crash recovery
///
/// # Example
///
/// ```rust,no_run
/// use contacts_core::store::FileKvStore;
/// use contacts_core::traits::KvStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileKvStore::new("/var/lib/contacts/store.json").await?;
///
///     // Atomically written to disk
///     store.set("contact-app-data", "[]").await?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FileKvStore {
    path: PathBuf,
    /// Serializes read-modify-write of the document
    write_lock: Mutex<()>,
}

/// Serializable store file format
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct StoreFileFormat {
    version: String,
    entries: BTreeMap<String, String>,
}

impl FileKvStore {
    /// Create or open a file store
    ///
    /// This will:
    /// 1. Create parent directories if needed
    /// 2. Check the existing document, restoring it from backup if corrupted
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !fs::try_exists(parent).await.unwrap_or(false)
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::config(format!(
                    "Failed to create store directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let entries = Self::load_with_recovery(&path, true).await?;
        tracing::debug!("Opened file store {}: {} keys", path.display(), entries.len());

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load entries with automatic recovery
    ///
    /// Recovery strategy:
    /// 1. Try to load the main document
    /// 2. If it does not parse, try the backup (optionally restoring it)
    /// 3. If the backup is missing or also broken, start empty
    async fn load_with_recovery(
        path: &Path,
        restore: bool,
    ) -> Result<BTreeMap<String, String>, Error> {
        let content = match Self::read_optional(path).await? {
            Some(content) => content,
            None => {
                tracing::debug!("Store file does not exist: {}", path.display());
                return Ok(BTreeMap::new());
            }
        };

        let parse_err = match Self::parse(&content) {
            Ok(entries) => return Ok(entries),
            Err(e) => e,
        };

        tracing::warn!(
            "Store file {} appears corrupted: {}. Attempting recovery from backup.",
            path.display(),
            parse_err
        );

        let backup_path = Self::backup_path(path);
        let backup = match Self::read_optional(&backup_path).await? {
            Some(backup) => backup,
            None => {
                tracing::warn!("No backup file found. Starting with empty store.");
                return Ok(BTreeMap::new());
            }
        };

        match Self::parse(&backup) {
            Ok(entries) => {
                tracing::info!("Recovered store from backup: {} keys", entries.len());
                if restore {
                    if let Err(e) = fs::copy(&backup_path, path).await {
                        tracing::error!("Failed to restore store file from backup: {}", e);
                    } else {
                        tracing::info!("Restored store file from backup");
                    }
                }
                Ok(entries)
            }
            Err(backup_err) => {
                tracing::error!(
                    "Backup also corrupted: {}. Starting with empty store.",
                    backup_err
                );
                Ok(BTreeMap::new())
            }
        }
    }

    async fn read_optional(path: &Path) -> Result<Option<String>, Error> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::persistence(format!(
                "Failed to read store file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn parse(content: &str) -> Result<BTreeMap<String, String>, serde_json::Error> {
        let document: StoreFileFormat = serde_json::from_str(content)?;

        if document.version != STORE_FILE_VERSION {
            tracing::warn!(
                "Store file version mismatch: expected {}, got {}. Attempting to load anyway.",
                STORE_FILE_VERSION,
                document.version
            );
        }

        Ok(document.entries)
    }

    /// Write the document atomically
    async fn write_document(&self, entries: BTreeMap<String, String>) -> Result<(), Error> {
        let document = StoreFileFormat {
            version: STORE_FILE_VERSION.to_string(),
            entries,
        };

        let json = serde_json::to_string_pretty(&document)
            .map_err(|e| Error::persistence(format!("Failed to serialize store: {}", e)))?;

        // Write to temporary file first
        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::persistence(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::persistence(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::persistence(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        // Keep the previous document as backup, unless it is the broken one
        match Self::read_optional(&self.path).await {
            Ok(Some(current)) if Self::parse(&current).is_ok() => {
                let backup_path = Self::backup_path(&self.path);
                if let Err(e) = fs::copy(&self.path, &backup_path).await {
                    tracing::warn!("Failed to create backup: {}", e);
                }
            }
            Ok(Some(_)) => {
                tracing::warn!("Store file is corrupted, keeping the existing backup");
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to create backup: {}", e),
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::persistence(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("Store written to file: {}", self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    fn backup_path(path: &Path) -> PathBuf {
        let mut backup = path.to_path_buf();
        backup.set_extension("backup");
        backup
    }
}

#[async_trait]
impl KvStore for FileKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let entries = Self::load_with_recovery(&self.path, false).await?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;

        let mut entries = Self::load_with_recovery(&self.path, false).await?;
        entries.insert(key.to_string(), value.to_string());

        self.write_document(entries).await
    }

    fn store_name(&self) -> &'static str {
        "file"
    }
}

/// Builds a [`FileKvStore`] from `StoreConfig::File`
#[derive(Debug, Default)]
pub struct FileKvStoreFactory;

#[async_trait]
impl KvStoreFactory for FileKvStoreFactory {
    async fn create(&self, config: &serde_json::Value) -> Result<Box<dyn KvStore>, Error> {
        match serde_json::from_value::<StoreConfig>(config.clone())? {
            StoreConfig::File { path } => Ok(Box::new(FileKvStore::new(path).await?)),
            other => Err(Error::config(format!(
                "file store factory cannot build a '{}' store",
                other.type_name()
            ))),
        }
    }
}
