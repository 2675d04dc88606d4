//! Action agents
//!
//! Each agent owns a closed set of actions invoked through `run`. An action
//! outside the set is answered with an "Unknown action" reply instead of an
//! error, so callers always get text back.

use crate::agents::{Agent, placeholder_reply, split_action, unknown_action};
use ajax_common::Result;
use async_trait::async_trait;

/// Code generation and editing
pub struct DevAgent;

impl DevAgent {
    const ACTIONS: &'static [&'static str] = &["react_component", "fix_backend_bug", "tailwind_card"];
}

#[async_trait]
impl Agent for DevAgent {
    fn name(&self) -> &str {
        "DevAgent"
    }

    async fn handle_task(&self, task: &str) -> Result<String> {
        let (action, payload) = split_action(task);
        self.run(action, payload).await
    }

    async fn run(&self, action: &str, payload: Option<&str>) -> Result<String> {
        let reply = match action {
            "react_component" => format!(
                "[DevAgent] Writing React component for {}",
                payload.unwrap_or("feature")
            ),
            "fix_backend_bug" => format!(
                "[DevAgent] Fixing backend bug: {}",
                payload.unwrap_or("issue")
            ),
            "tailwind_card" => format!(
                "[DevAgent] Generating Tailwind card for {}",
                payload.unwrap_or("content")
            ),
            _ => unknown_action(self.name(), action),
        };
        Ok(reply)
    }

    fn actions(&self) -> &[&'static str] {
        Self::ACTIONS
    }
}

/// Task queues and notifications
pub struct OpsAgent;

impl OpsAgent {
    const ACTIONS: &'static [&'static str] = &["queue_task", "stats", "notify"];
}

#[async_trait]
impl Agent for OpsAgent {
    fn name(&self) -> &str {
        "OpsAgent"
    }

    async fn handle_task(&self, task: &str) -> Result<String> {
        let (action, payload) = split_action(task);
        self.run(action, payload).await
    }

    async fn run(&self, action: &str, payload: Option<&str>) -> Result<String> {
        let reply = match action {
            "queue_task" => format!("[OpsAgent] Queued task: {}", payload.unwrap_or("task")),
            "stats" => "[OpsAgent] Reporting system stats".to_string(),
            "notify" => format!(
                "[OpsAgent] Sending notification: {}",
                payload.unwrap_or("message")
            ),
            _ => unknown_action(self.name(), action),
        };
        Ok(reply)
    }

    fn actions(&self) -> &[&'static str] {
        Self::ACTIONS
    }
}

/// Customer service
///
/// Free-form tasks get the placeholder reply; DM and comment replies go
/// through `run`.
pub struct SupportAgent;

impl SupportAgent {
    const ACTIONS: &'static [&'static str] = &["reply_dm", "reply_comment"];
}

#[async_trait]
impl Agent for SupportAgent {
    fn name(&self) -> &str {
        "SupportAgent"
    }

    async fn handle_task(&self, task: &str) -> Result<String> {
        Ok(placeholder_reply(
            self.name(),
            task,
            "customer support functionality",
        ))
    }

    async fn run(&self, action: &str, payload: Option<&str>) -> Result<String> {
        let reply = match action {
            "reply_dm" => format!(
                "[SupportAgent] Replying to DM: {}",
                payload.unwrap_or("message")
            ),
            "reply_comment" => format!(
                "[SupportAgent] Replying to comment: {}",
                payload.unwrap_or("comment")
            ),
            _ => unknown_action(self.name(), action),
        };
        Ok(reply)
    }

    fn actions(&self) -> &[&'static str] {
        Self::ACTIONS
    }
}

/// Social media growth
pub struct GrowthAgent;

impl GrowthAgent {
    const ACTIONS: &'static [&'static str] = &["slideshow", "dm", "scrape"];
}

#[async_trait]
impl Agent for GrowthAgent {
    fn name(&self) -> &str {
        "GrowthAgent"
    }

    async fn handle_task(&self, task: &str) -> Result<String> {
        Ok(placeholder_reply(
            self.name(),
            task,
            "growth analysis functionality",
        ))
    }

    async fn run(&self, action: &str, payload: Option<&str>) -> Result<String> {
        let reply = match action {
            "slideshow" => format!(
                "[GrowthAgent] Creating slideshow for {}",
                payload.unwrap_or("general topic")
            ),
            "dm" => format!(
                "[GrowthAgent] Sending follow-up DM to {}",
                payload.unwrap_or("target")
            ),
            "scrape" => format!(
                "[GrowthAgent] Scraping competitor {}",
                payload.unwrap_or("profile")
            ),
            _ => unknown_action(self.name(), action),
        };
        Ok(reply)
    }

    fn actions(&self) -> &[&'static str] {
        Self::ACTIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dev_actions() {
        assert_eq!(
            DevAgent.run("react_component", Some("pricing page")).await.unwrap(),
            "[DevAgent] Writing React component for pricing page"
        );
        assert_eq!(
            DevAgent.run("fix_backend_bug", None).await.unwrap(),
            "[DevAgent] Fixing backend bug: issue"
        );
        assert_eq!(
            DevAgent.handle_task("tailwind_card hero banner").await.unwrap(),
            "[DevAgent] Generating Tailwind card for hero banner"
        );
    }

    #[tokio::test]
    async fn test_ops_actions() {
        assert_eq!(
            OpsAgent.handle_task("stats").await.unwrap(),
            "[OpsAgent] Reporting system stats"
        );
        assert_eq!(
            OpsAgent.run("notify", Some("deploy done")).await.unwrap(),
            "[OpsAgent] Sending notification: deploy done"
        );
        assert_eq!(
            OpsAgent.handle_task("queue_task").await.unwrap(),
            "[OpsAgent] Queued task: task"
        );
    }

    #[tokio::test]
    async fn test_unknown_action_is_soft_failure() {
        assert_eq!(
            OpsAgent.handle_task("reboot the world").await.unwrap(),
            "[OpsAgent] Unknown action: reboot"
        );
        assert_eq!(
            SupportAgent.run("refund", Some("order 7")).await.unwrap(),
            "[SupportAgent] Unknown action: refund"
        );
        assert_eq!(
            GrowthAgent.run("viral", None).await.unwrap(),
            "[GrowthAgent] Unknown action: viral"
        );
    }

    #[tokio::test]
    async fn test_support_and_growth_keep_placeholder_tasks() {
        let reply = SupportAgent.handle_task("Where is my order?").await.unwrap();
        assert_eq!(
            reply,
            "[SupportAgent] Processing task: Where is my order? \
             (customer support functionality not yet implemented)"
        );

        let reply = GrowthAgent.handle_task("Grow IG").await.unwrap();
        assert!(reply.starts_with("[GrowthAgent] Processing task: Grow IG"));

        assert_eq!(
            SupportAgent.run("reply_dm", None).await.unwrap(),
            "[SupportAgent] Replying to DM: message"
        );
        assert_eq!(
            GrowthAgent.run("scrape", Some("@rival")).await.unwrap(),
            "[GrowthAgent] Scraping competitor @rival"
        );
    }

    #[test]
    fn test_action_tables() {
        assert_eq!(DevAgent.actions().len(), 3);
        assert!(OpsAgent.actions().contains(&"notify"));
        assert!(SupportAgent.actions().contains(&"reply_comment"));
        assert!(GrowthAgent.actions().contains(&"slideshow"));
    }
}
