//! Agent registry for delegating tasks by name

use crate::agents::Agent;
use ajax_common::{AjaxError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Type alias for agent storage
type AgentMap = RwLock<HashMap<String, Arc<dyn Agent>>>;

/// Name -> agent mapping
///
/// Names are unique; a second registration under the same name is an error
/// rather than an overwrite.
pub struct AgentRegistry {
    agents: AgentMap,
}

impl AgentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        AgentRegistry {
            agents: RwLock::new(HashMap::new()),
        }
    }

    /// Register an agent under `name`
    pub async fn register(&self, name: impl Into<String>, agent: impl Agent + 'static) -> Result<()> {
        self.register_shared(name, Arc::new(agent)).await
    }

    /// Register an already shared agent under `name`
    pub async fn register_shared(&self, name: impl Into<String>, agent: Arc<dyn Agent>) -> Result<()> {
        let name = name.into();
        debug!("Registering agent: {}", name);

        let mut agents = self.agents.write().await;
        if agents.contains_key(&name) {
            return Err(AjaxError::DuplicateName(name));
        }

        agents.insert(name.clone(), agent);
        debug!("Successfully registered agent: {}", name);
        Ok(())
    }

    /// Look up an agent by name
    pub async fn get(&self, name: &str) -> Result<Arc<dyn Agent>> {
        let agents = self.agents.read().await;
        agents
            .get(name)
            .cloned()
            .ok_or_else(|| AjaxError::UnknownAgent(name.to_string()))
    }

    /// Hand a task to the named agent and return its reply untouched
    pub async fn delegate(&self, name: &str, task: &str) -> Result<String> {
        // Release the read lock before the agent runs
        let agent = self.get(name).await?;
        debug!("Delegating to {}: {}", name, task);
        agent.handle_task(task).await
    }

    /// Invoke a named action on the named agent
    pub async fn run(&self, name: &str, action: &str, payload: Option<&str>) -> Result<String> {
        let agent = self.get(name).await?;
        debug!("Running {} on {} (payload: {:?})", action, name, payload);
        agent.run(action, payload).await
    }

    /// Registered names, sorted
    pub async fn list(&self) -> Vec<String> {
        let agents = self.agents.read().await;
        let mut names: Vec<String> = agents.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if an agent exists
    pub async fn contains(&self, name: &str) -> bool {
        let agents = self.agents.read().await;
        agents.contains_key(name)
    }

    pub async fn len(&self) -> usize {
        self.agents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.agents.read().await.is_empty()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
