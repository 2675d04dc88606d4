//! Persisted presence
//!
//! `agent_state.json` remembers the last mode so a restart comes back the
//! way the principal left it. The status board stays in memory only.

use ajax_common::{Mode, Result, current_timestamp};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Contents of `agent_state.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentState {
    pub mode: Mode,
    pub updated_at: String,
}

pub struct PresenceStore {
    path: Option<PathBuf>,
    memory: Mutex<Option<AgentState>>,
}

impl PresenceStore {
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            memory: Mutex::new(None),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            memory: Mutex::new(None),
        }
    }

    /// Last saved state; a missing or unreadable file counts as none
    pub async fn load(&self) -> Result<Option<AgentState>> {
        let guard = self.memory.lock().await;
        let Some(path) = &self.path else {
            return Ok(guard.clone());
        };

        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&content) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!("Ignoring unreadable agent state {:?}: {}", path, e);
                Ok(None)
            }
        }
    }

    pub async fn save(&self, mode: Mode) -> Result<AgentState> {
        let mut guard = self.memory.lock().await;
        let state = AgentState {
            mode,
            updated_at: current_timestamp(),
        };
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let tmp = path.with_extension("json.tmp");
            tokio::fs::write(&tmp, serde_json::to_string_pretty(&state)?).await?;
            tokio::fs::rename(&tmp, path).await?;
            debug!("Saved mode {} to {:?}", mode, path);
        }
        *guard = Some(state.clone());
        Ok(state)
    }
}
