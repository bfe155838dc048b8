//! Directory-backed document store.
//!
//! Each entry is one JSON document under `<base>/<user-id>/entries/`,
//! written atomically. Subscriptions are watch channels carrying the full
//! ordered collection; every append pushes a complete replacement snapshot
//! to the user's subscribers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{watch, RwLock};
use uuid::Uuid;

use cuaderno_core::entry::{Entry, EntryId, EntryPayload};
use cuaderno_core::error::{CuadernoError, Result};
use cuaderno_core::store::{DocumentStore, EntrySnapshot};

use crate::storage::AtomicJsonFile;

/// Document store persisting entries as one JSON file each.
///
/// Directory structure:
/// ```text
/// base_dir/
/// └── <user-id>/
///     └── entries/
///         ├── <entry-id>.json
///         └── <entry-id>.json
/// ```
pub struct JsonDirEntryStore {
    base_dir: PathBuf,
    watchers: RwLock<HashMap<String, watch::Sender<EntrySnapshot>>>,
}

impl JsonDirEntryStore {
    /// Creates a store rooted at `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            watchers: RwLock::new(HashMap::new()),
        }
    }

    fn entries_dir(&self, user_id: &str) -> PathBuf {
        self.base_dir.join(user_id).join("entries")
    }

    /// Reads and orders a user's full collection, newest first.
    ///
    /// A document that fails to parse is skipped with a warning; one
    /// corrupt file must not take down the whole list.
    fn read_collection(dir: &Path) -> Result<Vec<Entry>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for dirent in std::fs::read_dir(dir)? {
            let path = dirent?.path();
            let file_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };
            if file_name.starts_with('.') || !file_name.ends_with(".json") {
                continue;
            }
            match AtomicJsonFile::<Entry>::new(path.clone()).load() {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Skipping unreadable entry: {}", e);
                }
            }
        }

        entries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(entries)
    }

    async fn load_collection(dir: PathBuf) -> Result<Vec<Entry>> {
        tokio::task::spawn_blocking(move || Self::read_collection(&dir))
            .await
            .map_err(|e| CuadernoError::internal(format!("Blocking read failed: {}", e)))?
    }

    /// Pushes a fresh snapshot to the user's subscribers, if any.
    async fn notify(&self, user_id: &str) {
        let watchers = self.watchers.read().await;
        let Some(tx) = watchers.get(user_id) else {
            return;
        };
        let snapshot = Self::load_collection(self.entries_dir(user_id)).await;
        tx.send_replace(snapshot.map_err(|e| {
            tracing::error!("Failed to reload entry collection: {}", e);
            e
        }));
    }
}

#[async_trait]
impl DocumentStore for JsonDirEntryStore {
    async fn append(&self, user_id: &str, payload: EntryPayload) -> Result<EntryId> {
        let entry = Entry {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            payload,
        };
        let entry_id = entry.id.clone();
        let path = self.entries_dir(user_id).join(format!("{}.json", entry.id));

        tokio::task::spawn_blocking(move || AtomicJsonFile::new(path).save(&entry))
            .await
            .map_err(|e| CuadernoError::internal(format!("Blocking write failed: {}", e)))?
            .map_err(|e| CuadernoError::store(format!("No se pudo escribir la entrada: {}", e)))?;

        tracing::debug!(entry_id = %entry_id, user_id = %user_id, "Entry document written");
        self.notify(user_id).await;
        Ok(entry_id)
    }

    async fn subscribe(&self, user_id: &str) -> Result<watch::Receiver<EntrySnapshot>> {
        let mut watchers = self.watchers.write().await;
        if let Some(tx) = watchers.get(user_id) {
            return Ok(tx.subscribe());
        }

        let dir = self.entries_dir(user_id);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| CuadernoError::store(format!("No se pudo abrir la colección: {}", e)))?;

        let initial = Self::load_collection(dir).await?;
        let (tx, rx) = watch::channel(Ok(initial));
        watchers.insert(user_id.to_string(), tx);
        Ok(rx)
    }
}
