//! Task log and task queue
//!
//! The task log is an append-only JSON-lines file with one entry per handled
//! chat turn or queued task. The queue is a single JSON array of pending and
//! done entries, rewritten on every change. Both keep their file behind an
//! async mutex; with no path they live in memory only.

use ajax_common::{AjaxError, Result, current_timestamp};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// One line of `tasklog.jsonl`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLogEntry {
    pub timestamp: String,
    pub task: String,
    pub response: String,
}

impl TaskLogEntry {
    pub fn new(task: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            timestamp: current_timestamp(),
            task: task.into(),
            response: response.into(),
        }
    }
}

pub struct TaskLog {
    path: Option<PathBuf>,
    memory: Mutex<Vec<TaskLogEntry>>,
}

impl TaskLog {
    /// Log backed by a JSON-lines file; parent directories are created on
    /// first write
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            memory: Mutex::new(Vec::new()),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            memory: Mutex::new(Vec::new()),
        }
    }

    pub async fn append(&self, entry: TaskLogEntry) -> Result<()> {
        let mut guard = self.memory.lock().await;
        let Some(path) = &self.path else {
            guard.push(entry);
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        debug!("Logged task: {}", entry.task);
        Ok(())
    }

    /// All entries, oldest first; unreadable lines are skipped
    pub async fn entries(&self) -> Result<Vec<TaskLogEntry>> {
        let guard = self.memory.lock().await;
        let Some(path) = &self.path else {
            return Ok(guard.clone());
        };

        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for (n, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<TaskLogEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping malformed task log line {}: {}", n + 1, e),
            }
        }
        Ok(entries)
    }
}

/// Queue entry status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Done,
}

/// One entry of `queue.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEntry {
    pub id: u64,
    pub description: String,
    pub status: TaskStatus,
    pub timestamp: String,
}

pub struct TaskQueue {
    path: Option<PathBuf>,
    memory: Mutex<Vec<TaskEntry>>,
}

impl TaskQueue {
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            memory: Mutex::new(Vec::new()),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            memory: Mutex::new(Vec::new()),
        }
    }

    async fn load(&self, cached: &[TaskEntry]) -> Result<Vec<TaskEntry>> {
        let Some(path) = &self.path else {
            return Ok(cached.to_vec());
        };
        match tokio::fs::read_to_string(path).await {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, entries: &[TaskEntry]) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Add an entry with the next free id
    pub async fn push(&self, description: &str, status: TaskStatus) -> Result<TaskEntry> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AjaxError::EmptyInput);
        }

        let mut guard = self.memory.lock().await;
        let mut entries = self.load(&guard).await?;
        let id = entries.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        let entry = TaskEntry {
            id,
            description: description.to_string(),
            status,
            timestamp: current_timestamp(),
        };
        entries.push(entry.clone());
        self.save(&entries).await?;
        *guard = entries;
        debug!("Queued task #{}: {}", id, entry.description);
        Ok(entry)
    }

    /// Queue a pending task
    pub async fn enqueue(&self, description: &str) -> Result<TaskEntry> {
        self.push(description, TaskStatus::Pending).await
    }

    /// Mark an entry done
    pub async fn complete(&self, id: u64) -> Result<TaskEntry> {
        let mut guard = self.memory.lock().await;
        let mut entries = self.load(&guard).await?;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| AjaxError::NotFound(format!("Task #{}", id)))?;
        entry.status = TaskStatus::Done;
        let done = entry.clone();
        self.save(&entries).await?;
        *guard = entries;
        Ok(done)
    }

    pub async fn list(&self) -> Result<Vec<TaskEntry>> {
        let guard = self.memory.lock().await;
        self.load(&guard).await
    }
}
