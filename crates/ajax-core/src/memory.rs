//! Rolling conversation memory
//!
//! Each conversation keeps its most recent `cap` messages; older ones are
//! dropped first-in first-out on every write. Writes to the same
//! conversation are serialised through a per-id lock so concurrent turns
//! cannot lose each other's messages, while different conversations proceed
//! in parallel.

use crate::store::ConversationStore;
use ajax_common::{Result, Role, current_timestamp, keep_last};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// One role-tagged message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: String,
}

impl ConversationMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self::at(role, content, current_timestamp())
    }

    pub fn at(role: Role, content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Persisted state of one conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    #[serde(default)]
    pub messages: Vec<ConversationMessage>,
    #[serde(default)]
    pub instructions: String,
}

impl ConversationRecord {
    pub fn new(instructions: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            instructions: instructions.into(),
        }
    }
}

pub struct ConversationMemory {
    store: Arc<dyn ConversationStore>,
    cap: usize,
    default_instructions: String,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ConversationMemory {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        cap: usize,
        default_instructions: impl Into<String>,
    ) -> Self {
        Self {
            store,
            cap: cap.max(1),
            default_instructions: default_instructions.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    async fn lock_for(&self, id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the map entry for `id` once no other writer holds or awaits it
    async fn release(&self, id: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().await;
        // The map and `lock` itself
        if Arc::strong_count(&lock) == 2 {
            locks.remove(id);
        }
    }

    /// Load, modify and store the record for `id` under its lock
    async fn update<F>(&self, id: &str, change: F) -> Result<()>
    where
        F: FnOnce(&mut ConversationRecord),
    {
        let lock = self.lock_for(id).await;
        let result = {
            let _guard = lock.lock().await;
            match self.load(id).await {
                Ok(mut record) => {
                    change(&mut record);
                    self.store.set(id, &record).await
                }
                Err(e) => Err(e),
            }
        };
        self.release(id, lock).await;
        result
    }

    async fn load(&self, id: &str) -> Result<ConversationRecord> {
        let record = self
            .store
            .get(id)
            .await?
            .unwrap_or_else(|| ConversationRecord::new(self.default_instructions.clone()));
        Ok(record)
    }

    /// Full record for `id`; unknown ids get an empty record with the
    /// default instructions
    pub async fn record(&self, id: &str) -> Result<ConversationRecord> {
        self.load(id).await
    }

    /// Append one message
    pub async fn append(&self, id: &str, message: ConversationMessage) -> Result<()> {
        self.append_all(id, vec![message]).await
    }

    /// Append several messages as one write, evicting the oldest past the cap
    pub async fn append_all(&self, id: &str, messages: Vec<ConversationMessage>) -> Result<()> {
        let cap = self.cap;
        self.update(id, |record| {
            record.messages.extend(messages);
            let before = record.messages.len();
            keep_last(&mut record.messages, cap);
            if before > record.messages.len() {
                debug!(
                    "Evicted {} message(s) from conversation {}",
                    before - record.messages.len(),
                    id
                );
            }
        })
        .await
    }

    /// The last `n` messages, oldest first
    pub async fn window(&self, id: &str, n: usize) -> Result<Vec<ConversationMessage>> {
        let mut messages = self.load(id).await?.messages;
        keep_last(&mut messages, n);
        Ok(messages)
    }

    pub async fn instructions(&self, id: &str) -> Result<String> {
        Ok(self.load(id).await?.instructions)
    }

    pub async fn set_instructions(&self, id: &str, instructions: impl Into<String>) -> Result<()> {
        let instructions = instructions.into();
        self.update(id, |record| record.instructions = instructions).await
    }

    /// Ids of conversations with stored records
    pub async fn conversation_ids(&self) -> Result<Vec<String>> {
        self.store.ids().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryConversationStore, JsonFileConversationStore};

    fn memory(cap: usize) -> ConversationMemory {
        ConversationMemory::new(Arc::new(InMemoryConversationStore::new()), cap, "default")
    }

    #[tokio::test]
    async fn test_unknown_conversation_is_empty_with_default_instructions() {
        let memory = memory(20);
        let record = memory.record("nobody").await.unwrap();
        assert!(record.messages.is_empty());
        assert_eq!(record.instructions, "default");
    }

    #[tokio::test]
    async fn test_cap_evicts_oldest_first() {
        let memory = memory(20);
        for i in 1..=21 {
            memory
                .append("general", ConversationMessage::new(Role::User, format!("m{}", i)))
                .await
                .unwrap();
        }

        let record = memory.record("general").await.unwrap();
        assert_eq!(record.messages.len(), 20);
        let contents: Vec<&str> = record.messages.iter().map(|m| m.content.as_str()).collect();
        let expected: Vec<String> = (2..=21).map(|i| format!("m{}", i)).collect();
        assert_eq!(contents, expected);
    }

    #[tokio::test]
    async fn test_window_returns_trailing_messages() {
        let memory = memory(10);
        memory
            .append_all(
                "general",
                vec![
                    ConversationMessage::new(Role::User, "one"),
                    ConversationMessage::new(Role::Assistant, "two"),
                    ConversationMessage::new(Role::User, "three"),
                ],
            )
            .await
            .unwrap();

        let window = memory.window("general", 2).await.unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].content, "two");
        assert_eq!(window[1].content, "three");

        let all = memory.window("general", 50).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_conversations_are_independent() {
        let memory = memory(5);
        memory
            .append("a", ConversationMessage::new(Role::User, "for a"))
            .await
            .unwrap();
        memory
            .append("b", ConversationMessage::new(Role::User, "for b"))
            .await
            .unwrap();

        assert_eq!(memory.window("a", 5).await.unwrap()[0].content, "for a");
        assert_eq!(memory.window("b", 5).await.unwrap()[0].content, "for b");
        assert_eq!(memory.conversation_ids().await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_not_lost() {
        let memory = Arc::new(memory(1000));
        let mut handles = Vec::new();
        for i in 0..50 {
            let memory = memory.clone();
            handles.push(tokio::spawn(async move {
                memory
                    .append("shared", ConversationMessage::new(Role::User, format!("m{}", i)))
                    .await
                    .unwrap();
            }));
        }
        for handle in futures::future::join_all(handles).await {
            handle.unwrap();
        }

        assert_eq!(memory.record("shared").await.unwrap().messages.len(), 50);
    }

    #[tokio::test]
    async fn test_lookalike_ids_do_not_share_a_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonFileConversationStore::open(dir.path()).await.unwrap());
        let memory = Arc::new(ConversationMemory::new(store, 1000, "default"));

        memory
            .append("team/a", ConversationMessage::new(Role::User, "secret for team/a"))
            .await
            .unwrap();
        assert!(memory.record("team_a").await.unwrap().messages.is_empty());

        let mut handles = Vec::new();
        for i in 0..40 {
            let memory = memory.clone();
            let id = if i % 2 == 0 { "x/y" } else { "x_y" };
            handles.push(tokio::spawn(async move {
                memory
                    .append(id, ConversationMessage::new(Role::User, format!("m{}", i)))
                    .await
                    .unwrap();
            }));
        }
        for handle in futures::future::join_all(handles).await {
            handle.unwrap();
        }

        assert_eq!(memory.record("x/y").await.unwrap().messages.len(), 20);
        assert_eq!(memory.record("x_y").await.unwrap().messages.len(), 20);
    }

    #[tokio::test]
    async fn test_locks_are_released_after_writes() {
        let memory = Arc::new(memory(10));
        let mut handles = Vec::new();
        for i in 0..30 {
            let memory = memory.clone();
            handles.push(tokio::spawn(async move {
                let id = format!("conv-{}", i % 3);
                memory
                    .append(&id, ConversationMessage::new(Role::User, "hi"))
                    .await
                    .unwrap();
            }));
        }
        for handle in futures::future::join_all(handles).await {
            handle.unwrap();
        }
        memory.set_instructions("conv-0", "Be brief.").await.unwrap();

        assert!(memory.locks.lock().await.is_empty());
        assert_eq!(memory.record("conv-1").await.unwrap().messages.len(), 10);
    }

    #[tokio::test]
    async fn test_instructions_survive_appends() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonFileConversationStore::open(dir.path()).await.unwrap());
        let memory = ConversationMemory::new(store, 3, "default");

        memory.set_instructions("proj", "Talk like a pirate").await.unwrap();
        for i in 0..5 {
            memory
                .append("proj", ConversationMessage::new(Role::User, format!("m{}", i)))
                .await
                .unwrap();
        }

        let record = memory.record("proj").await.unwrap();
        assert_eq!(record.instructions, "Talk like a pirate");
        assert_eq!(record.messages.len(), 3);
        assert_eq!(record.messages[0].content, "m2");
    }
}
