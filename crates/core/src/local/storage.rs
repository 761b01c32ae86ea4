//! Local keyed-entry storage
//!
//! String-keyed entries holding serialized JSON payloads, persisted as a
//! single JSON object file. A missing file or missing key means "use
//! built-in defaults", never an error.

use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::warn;

use crate::error::Error;
use crate::Result;

/// File-backed key/value storage for the local backend
pub struct Storage {
    /// Path to the JSON file
    path: PathBuf,
    /// In-memory copy of the entries
    entries: RwLock<HashMap<String, String>>,
}

impl Storage {
    /// Open the storage at the given path
    ///
    /// If the file doesn't exist, it will be created on first write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| Error::Storage(format!("Failed to read storage file: {}", e)))?;
            serde_json::from_str(&content)
                .map_err(|e| Error::Storage(format!("Failed to parse storage file: {}", e)))?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Read the entry stored under `key`
    pub async fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().await;
        entries.get(key).cloned()
    }

    /// Store `value` under `key`
    ///
    /// The in-memory entry is updated first; a failure to rewrite the file
    /// afterwards is logged and tolerated, so the caller still observes the
    /// mutated value.
    pub async fn put(&self, key: &str, value: String) {
        {
            let mut entries = self.entries.write().await;
            entries.insert(key.to_string(), value);
        }
        if let Err(err) = self.flush().await {
            warn!("Failed to persist local storage entry '{}': {}", key, err);
        }
    }

    /// Rewrite the whole entry map to disk
    async fn flush(&self) -> Result<()> {
        let entries = self.entries.read().await;
        let content = serde_json::to_string_pretty(&*entries)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}
