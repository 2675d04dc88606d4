//! Live status board
//!
//! A best-effort view of what Ajax is doing for UIs to poll. It lives only in
//! memory, starts fresh on every process start and is last-writer-wins: each
//! update replaces fields under a short write lock and nothing ever reads it
//! back to make a decision.

use ajax_common::{LiveStatus, Mode, STATUS_HISTORY_LEN, keep_last};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Point-in-time copy of the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub mode: Mode,
    /// Last input handled, command or not
    pub last_command: Option<String>,
    /// Task currently delegated or being worked on
    pub current_task: Option<String>,
    /// Agent a delegation is in flight with
    pub delegation: Option<String>,
    pub live_status: LiveStatus,
    /// Most recent replies, oldest first
    pub history: Vec<String>,
}

impl StatusSnapshot {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            last_command: None,
            current_task: None,
            delegation: None,
            live_status: LiveStatus::Idle,
            history: Vec::new(),
        }
    }
}

pub struct StatusBoard {
    inner: RwLock<StatusSnapshot>,
}

impl StatusBoard {
    pub fn new(mode: Mode) -> Self {
        Self {
            inner: RwLock::new(StatusSnapshot::new(mode)),
        }
    }

    pub async fn snapshot(&self) -> StatusSnapshot {
        self.inner.read().await.clone()
    }

    pub async fn set_mode(&self, mode: Mode) {
        self.inner.write().await.mode = mode;
    }

    pub async fn set_last_command(&self, command: &str) {
        self.inner.write().await.last_command = Some(command.to_string());
    }

    pub async fn set_current_task(&self, task: &str) {
        self.inner.write().await.current_task = Some(task.to_string());
    }

    /// Mark a delegation (or tool call) as in flight
    pub async fn begin_work(&self, agent: Option<&str>, task: &str) {
        let mut status = self.inner.write().await;
        status.live_status = LiveStatus::Working;
        status.current_task = Some(task.to_string());
        status.delegation = agent.map(str::to_string);
    }

    /// Back to idle; the current task stays visible
    pub async fn finish_work(&self) {
        let mut status = self.inner.write().await;
        status.live_status = LiveStatus::Idle;
        status.delegation = None;
    }

    /// Remember a reply, keeping only the most recent few
    pub async fn push_history(&self, entry: impl Into<String>) {
        let mut status = self.inner.write().await;
        status.history.push(entry.into());
        keep_last(&mut status.history, STATUS_HISTORY_LEN);
    }
}
