//! Durable key/value storage for the session token
//!
//! The token survives process restarts in a small JSON file under the
//! platform data directory. Entries are keyed so that the salary call can
//! read the persisted `access_token` independently of the in-memory copy.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use super::errors::{StorageError, StorageResult};

/// Key under which the bearer token is persisted
pub const TOKEN_KEY: &str = "access_token";

pub(crate) const STORE_FILE: &str = "session.json";

/// Minimal async key/value store
#[async_trait]
pub trait DurableStore: Send + Sync + std::fmt::Debug {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removing an absent key is not an error
    async fn remove_item(&self, key: &str) -> StorageResult<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredItem {
    value: String,
    stored_at: DateTime<Utc>,
}

/// JSON-file backed store
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // serializes read-modify-write cycles within the process
    lock: tokio::sync::Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    /// `<data_dir>/roster-admin/session.json`
    pub fn default_path() -> StorageResult<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "roster", "roster-admin").ok_or_else(|| {
                StorageError::InitFailed(
                    "Unable to determine data directory".to_string(),
                )
            })?;
        Ok(proj_dirs.data_dir().join(STORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> StorageResult<BTreeMap<String, StoredItem>> {
        if !tokio::fs::try_exists(&self.path)
            .await
            .map_err(StorageError::ReadFailed)?
        {
            return Ok(BTreeMap::new());
        }

        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(StorageError::ReadFailed)?;
        if data.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&data)
            .map_err(|e| StorageError::CorruptedData(e.to_string()))
    }

    /// Read for modification; a corrupted file is replaced rather than
    /// blocking every later write.
    async fn read_for_update(
        &self,
    ) -> StorageResult<BTreeMap<String, StoredItem>> {
        match self.read_all().await {
            Ok(items) => Ok(items),
            Err(StorageError::CorruptedData(reason)) => {
                log::warn!(
                    "[FileStore] Discarding corrupted store at {}: {}",
                    self.path.display(),
                    reason
                );
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn write_all(
        &self,
        items: &BTreeMap<String, StoredItem>,
    ) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(StorageError::WriteFailed)?;
        }

        let json = serde_json::to_string_pretty(items)
            .map_err(|e| StorageError::CorruptedData(e.to_string()))?;

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);
        let mut file = options
            .open(&self.path)
            .await
            .map_err(StorageError::WriteFailed)?;

        // a file created elsewhere keeps its mode on open; tighten it before
        // any token bytes land
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(StorageError::WriteFailed)?;
        }

        file.write_all(json.as_bytes())
            .await
            .map_err(StorageError::WriteFailed)?;
        file.flush().await.map_err(StorageError::WriteFailed)?;

        Ok(())
    }
}

#[async_trait]
impl DurableStore for FileStore {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let _guard = self.lock.lock().await;
        let items = self.read_all().await?;
        Ok(items.get(key).map(|item| item.value.clone()))
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.lock.lock().await;
        let mut items = self.read_for_update().await?;
        items.insert(
            key.to_string(),
            StoredItem {
                value: value.to_string(),
                stored_at: Utc::now(),
            },
        );
        self.write_all(&items).await?;
        log::debug!("[FileStore] Stored '{}' at {}", key, self.path.display());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        let _guard = self.lock.lock().await;
        let mut items = self.read_for_update().await?;
        if items.remove(key).is_none() {
            return Ok(());
        }
        if items.is_empty() {
            match tokio::fs::remove_file(&self.path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(StorageError::WriteFailed(e)),
            }
            return Ok(());
        }
        self.write_all(&items).await
    }
}

/// Process-local store for tests and `--ephemeral` runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.lock().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.items.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.items.lock().remove(key);
        Ok(())
    }
}
