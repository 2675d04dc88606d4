//! Placeholder agents
//!
//! These echo the task back in a fixed format. They hold the registry slots
//! real implementations will take over without the router changing.

use crate::agents::{Agent, placeholder_reply};
use ajax_common::Result;
use async_trait::async_trait;

/// Stock analysis and trading ideas
pub struct InvestorAgent;

#[async_trait]
impl Agent for InvestorAgent {
    fn name(&self) -> &str {
        "InvestorAgent"
    }

    async fn handle_task(&self, task: &str) -> Result<String> {
        Ok(placeholder_reply(
            self.name(),
            task,
            "stock research functionality",
        ))
    }
}

/// Social media fan page content and scheduling
pub struct FanpageAgent;

#[async_trait]
impl Agent for FanpageAgent {
    fn name(&self) -> &str {
        "FanpageAgent"
    }

    async fn handle_task(&self, task: &str) -> Result<String> {
        Ok(placeholder_reply(
            self.name(),
            task,
            "social posting functionality",
        ))
    }
}

/// Agent registered at runtime from a name and a capability list
#[derive(Debug, Clone)]
pub struct ConfiguredAgent {
    name: String,
    capabilities: Vec<String>,
}

impl ConfiguredAgent {
    pub fn new(name: impl Into<String>, capabilities: Vec<String>) -> Self {
        Self {
            name: name.into(),
            capabilities,
        }
    }

    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    fn capability_summary(&self) -> String {
        let listed: Vec<&str> = self
            .capabilities
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();
        if listed.is_empty() {
            "functionality".to_string()
        } else {
            listed.join(", ")
        }
    }
}

#[async_trait]
impl Agent for ConfiguredAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle_task(&self, task: &str) -> Result<String> {
        Ok(placeholder_reply(&self.name, task, &self.capability_summary()))
    }
}
