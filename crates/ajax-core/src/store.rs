//! Persistence backends for conversation records
//!
//! The store is a plain get/set mapping from conversation id to record.
//! Serialising writers per id is the memory layer's job; the file store keeps
//! one JSON file per conversation so that per-id locking is enough.

use crate::memory::ConversationRecord;
use ajax_common::{AjaxError, Result, decode_file_stem, encode_file_stem};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

/// Key-value storage for conversation records
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Record for `id`, or `None` when nothing was stored yet
    async fn get(&self, id: &str) -> Result<Option<ConversationRecord>>;

    /// Replace the record for `id`
    async fn set(&self, id: &str, record: &ConversationRecord) -> Result<()>;

    /// Ids with a stored record
    async fn ids(&self) -> Result<Vec<String>>;
}

/// Process-local store, used by tests and the CLI's ephemeral mode
#[derive(Default)]
pub struct InMemoryConversationStore {
    records: RwLock<HashMap<String, ConversationRecord>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn get(&self, id: &str) -> Result<Option<ConversationRecord>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn set(&self, id: &str, record: &ConversationRecord) -> Result<()> {
        self.records
            .write()
            .await
            .insert(id.to_string(), record.clone());
        Ok(())
    }

    async fn ids(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.records.read().await.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

/// One pretty-printed JSON file per conversation under `dir`
///
/// File names are the encoded id (see [`encode_file_stem`]), so every id
/// maps to its own file.
pub struct JsonFileConversationStore {
    dir: PathBuf,
}

impl JsonFileConversationStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            AjaxError::Storage(format!("Failed to create {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_file_stem(id)))
    }
}

#[async_trait]
impl ConversationStore for JsonFileConversationStore {
    async fn get(&self, id: &str) -> Result<Option<ConversationRecord>> {
        let path = self.path_for(id);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record: ConversationRecord = serde_json::from_str(&content)?;
        Ok(Some(record))
    }

    async fn set(&self, id: &str, record: &ConversationRecord) -> Result<()> {
        let path = self.path_for(id);
        let content = serde_json::to_string_pretty(record)?;

        // Write then rename so readers never see a half-written file
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!("Saved conversation {} to {:?}", id, path);
        Ok(())
    }

    async fn ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = dir.next_entry().await? {
            if let Some(name) = entry.file_name().to_str() {
                if let Some(id) = name.strip_suffix(".json").and_then(decode_file_stem) {
                    ids.push(id);
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}
