//! Agent module for task delegation
//!
//! This module provides the agent capability trait, the registry Ajax
//! delegates through, and the built-in agents registered at startup.

pub mod actions;
pub mod placeholder;
pub mod registry;

pub use actions::{DevAgent, GrowthAgent, OpsAgent, SupportAgent};
pub use placeholder::{ConfiguredAgent, FanpageAgent, InvestorAgent};
pub use registry::AgentRegistry;

use ajax_common::Result;
use async_trait::async_trait;

/// Core trait for agents Ajax can delegate to
#[async_trait]
pub trait Agent: Send + Sync {
    /// Display name used as the reply tag, e.g. `InvestorAgent`
    fn name(&self) -> &str;

    /// Process a free-form task and return the reply verbatim
    async fn handle_task(&self, task: &str) -> Result<String>;

    /// Run a named action with an optional payload
    ///
    /// Agents without an action table answer every action as unknown.
    async fn run(&self, action: &str, _payload: Option<&str>) -> Result<String> {
        Ok(unknown_action(self.name(), action))
    }

    /// Names of the actions `run` understands
    fn actions(&self) -> &[&'static str] {
        &[]
    }
}

/// Soft-failure reply for an action outside an agent's table
pub fn unknown_action(agent_name: &str, action: &str) -> String {
    format!("[{}] Unknown action: {}", agent_name, action)
}

/// Placeholder reply shared by the stub agents
pub fn placeholder_reply(agent_name: &str, task: &str, capability: &str) -> String {
    format!(
        "[{}] Processing task: {} ({} not yet implemented)",
        agent_name, task, capability
    )
}

/// Split a task into an action word and an optional payload
pub fn split_action(task: &str) -> (&str, Option<&str>) {
    let task = task.trim();
    match task.split_once(char::is_whitespace) {
        Some((action, rest)) => {
            let rest = rest.trim();
            (action, if rest.is_empty() { None } else { Some(rest) })
        }
        None => (task, None),
    }
}

/// Registry with the agents Ajax ships with
///
/// `investor`, `fanpage`, `support` and `growth` answer free-form tasks with
/// placeholders; `dev` and `ops` take action commands.
pub async fn build_default_registry() -> Result<AgentRegistry> {
    let registry = AgentRegistry::new();
    registry.register("investor", InvestorAgent).await?;
    registry.register("fanpage", FanpageAgent).await?;
    registry.register("support", SupportAgent).await?;
    registry.register("growth", GrowthAgent).await?;
    registry.register("dev", DevAgent).await?;
    registry.register("ops", OpsAgent).await?;
    Ok(registry)
}
