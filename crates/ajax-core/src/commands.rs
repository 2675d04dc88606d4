//! Command interpretation for inbound chat text
//!
//! Text is matched case-insensitively against an ordered set of directives
//! and the first match wins:
//!
//! 1. `/<principal>in`  - principal present, assistant mode
//! 2. `/<principal>out` - principal away, Ajax speaks as them
//! 3. `/delegate <agent> <task>`
//! 4. canned greetings and FAQ answers
//! 5. anything else is conversation, possibly routed through a tool
//!
//! Parsing is pure; [`CommandInterpreter::interpret`] applies the side
//! effects of steps 1-4 and hands step 5 back to the caller.

use crate::router::Ajax;
use crate::status::StatusBoard;
use ajax_common::{Mode, canned, capitalize, contains_any, replies, triggers};
use tracing::{debug, warn};

/// Parsed form of one inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    PrincipalIn,
    PrincipalOut,
    Delegate { agent: String, task: String },
    /// `/delegate` with fewer than three tokens
    DelegateUsage,
    Canned(&'static str),
    Converse(ToolRoute),
}

/// Which collaborator a conversational message should go through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolRoute {
    Image,
    Search,
    Plain,
}

impl ToolRoute {
    /// Image triggers win over search triggers
    pub fn detect(lowered: &str) -> Self {
        if contains_any(lowered, triggers::IMAGE) {
            ToolRoute::Image
        } else if contains_any(lowered, triggers::SEARCH) {
            ToolRoute::Search
        } else {
            ToolRoute::Plain
        }
    }
}

/// Result of interpreting a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A directive produced the final reply
    Reply(String),
    /// A presence command was applied
    Presence { present: bool, reply: String },
    /// Plain conversation the caller must answer
    Converse(ToolRoute),
}

pub struct CommandInterpreter {
    principal_in: String,
    principal_out: String,
    principal_display_name: String,
}

impl CommandInterpreter {
    /// `principal_name` is the lowercase token in `/<name>in` and `/<name>out`
    pub fn new(principal_name: &str, principal_display_name: &str) -> Self {
        let token = principal_name.trim().to_lowercase();
        let display = if principal_display_name.trim().is_empty() {
            capitalize(&token)
        } else {
            principal_display_name.trim().to_string()
        };
        Self {
            principal_in: format!("/{}in", token),
            principal_out: format!("/{}out", token),
            principal_display_name: display,
        }
    }

    pub fn principal_in_command(&self) -> &str {
        &self.principal_in
    }

    pub fn principal_out_command(&self) -> &str {
        &self.principal_out
    }

    pub fn principal_display_name(&self) -> &str {
        &self.principal_display_name
    }

    pub fn presence_acknowledgement(&self, present: bool) -> String {
        if present {
            format!(
                "{} is present. Switching to assistant mode.",
                self.principal_display_name
            )
        } else {
            format!(
                "{} is away. Speaking on their behalf.",
                self.principal_display_name
            )
        }
    }

    pub fn parse(&self, text: &str) -> Command {
        let trimmed = text.trim();
        let lowered = trimmed.to_lowercase();

        if lowered.starts_with(&self.principal_in) {
            return Command::PrincipalIn;
        }
        if lowered.starts_with(&self.principal_out) {
            return Command::PrincipalOut;
        }
        if next_token(&lowered).is_some_and(|(command, _)| command == "/delegate") {
            return parse_delegate(trimmed);
        }
        if canned::GREETINGS.contains(&lowered.as_str()) {
            return Command::Canned(replies::GREETING);
        }
        if canned::CAPABILITY_QUESTIONS.contains(&lowered.as_str()) {
            return Command::Canned(replies::CAPABILITIES);
        }
        if lowered.starts_with(canned::LOG_TASK_PREFIX) {
            return Command::Canned(replies::LOG_TASK_PROMPT);
        }

        Command::Converse(ToolRoute::detect(&lowered))
    }

    /// Parse and apply a message
    ///
    /// Presence commands flip the router and the board; delegations run
    /// against the registry with failures reported as reply text.
    pub async fn interpret(&self, ajax: &Ajax, status: &StatusBoard, text: &str) -> Outcome {
        match self.parse(text) {
            Command::PrincipalIn => self.apply_presence(ajax, status, true).await,
            Command::PrincipalOut => self.apply_presence(ajax, status, false).await,
            Command::Delegate { agent, task } => {
                Outcome::Reply(run_delegation(ajax, status, &agent, &task).await)
            }
            Command::DelegateUsage => Outcome::Reply(replies::DELEGATE_USAGE.to_string()),
            Command::Canned(reply) => Outcome::Reply(reply.to_string()),
            Command::Converse(route) => Outcome::Converse(route),
        }
    }

    async fn apply_presence(&self, ajax: &Ajax, status: &StatusBoard, present: bool) -> Outcome {
        ajax.set_principal_present(present);
        status.set_mode(Mode::from_presence(present)).await;
        Outcome::Presence {
            present,
            reply: self.presence_acknowledgement(present),
        }
    }
}

async fn run_delegation(ajax: &Ajax, status: &StatusBoard, agent: &str, task: &str) -> String {
    status.begin_work(Some(agent), task).await;
    let result = ajax.delegate(agent, task).await;
    status.finish_work().await;

    match result {
        Ok(reply) => {
            debug!("Delegation to {} succeeded", agent);
            reply
        }
        Err(e) => {
            warn!("Delegation to {} failed: {}", agent, e);
            format!("{}{}", replies::DELEGATION_ERROR_PREFIX, e)
        }
    }
}

/// Split `/delegate <agent> <task>` on the first two whitespace runs
fn parse_delegate(text: &str) -> Command {
    let Some((_, rest)) = next_token(text) else {
        return Command::DelegateUsage;
    };
    let Some((agent, task)) = next_token(rest) else {
        return Command::DelegateUsage;
    };
    if task.trim().is_empty() {
        return Command::DelegateUsage;
    }
    Command::Delegate {
        agent: agent.to_string(),
        task: task.to_string(),
    }
}

/// First whitespace-delimited token and the remainder after the run that
/// follows it
fn next_token(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    match text.find(char::is_whitespace) {
        Some(end) => Some((&text[..end], text[end..].trim_start())),
        None => Some((text, "")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::build_default_registry;
    use crate::personality::PersonalityStore;
    use ajax_common::LiveStatus;
    use std::sync::Arc;

    fn interpreter() -> CommandInterpreter {
        CommandInterpreter::new("logan", "Logan")
    }

    async fn ajax(present: bool) -> Ajax {
        let registry = Arc::new(build_default_registry().await.unwrap());
        Ajax::new(PersonalityStore::with_defaults("Logan"), registry, present).unwrap()
    }

    #[test]
    fn test_presence_commands_are_case_insensitive() {
        let interp = interpreter();
        assert_eq!(interp.parse("/loganin"), Command::PrincipalIn);
        assert_eq!(interp.parse("  /LoganIn please"), Command::PrincipalIn);
        assert_eq!(interp.parse("/LOGANOUT"), Command::PrincipalOut);
    }

    #[test]
    fn test_custom_principal_token() {
        let interp = CommandInterpreter::new("Maya", "");
        assert_eq!(interp.principal_in_command(), "/mayain");
        assert_eq!(interp.parse("/mayaout"), Command::PrincipalOut);
        assert_eq!(
            interp.presence_acknowledgement(true),
            "Maya is present. Switching to assistant mode."
        );
        assert_eq!(
            interp.parse("/loganin"),
            Command::Converse(ToolRoute::Plain)
        );
    }

    #[test]
    fn test_delegate_parsing_keeps_task_whitespace() {
        let interp = interpreter();
        assert_eq!(
            interp.parse("/delegate investor Analyze   TSLA earnings"),
            Command::Delegate {
                agent: "investor".to_string(),
                task: "Analyze   TSLA earnings".to_string(),
            }
        );
        assert_eq!(
            interp.parse("/DELEGATE\tfanpage  Post Reel"),
            Command::Delegate {
                agent: "fanpage".to_string(),
                task: "Post Reel".to_string(),
            }
        );
    }

    #[test]
    fn test_delegate_needs_its_own_token() {
        let interp = interpreter();
        assert_eq!(
            interp.parse("/delegatex foo bar"),
            Command::Converse(ToolRoute::Plain)
        );
        assert_eq!(
            interp.parse("/delegated investor stuff"),
            Command::Converse(ToolRoute::Plain)
        );
    }

    #[test]
    fn test_delegate_task_keeps_trailing_whitespace() {
        assert_eq!(
            parse_delegate("/delegate investor Analyze TSLA  \t"),
            Command::Delegate {
                agent: "investor".to_string(),
                task: "Analyze TSLA  \t".to_string(),
            }
        );
    }

    #[test]
    fn test_delegate_with_two_tokens_is_usage() {
        let interp = interpreter();
        assert_eq!(interp.parse("/delegate investor"), Command::DelegateUsage);
        assert_eq!(interp.parse("/delegate investor   "), Command::DelegateUsage);
        assert_eq!(interp.parse("/delegate"), Command::DelegateUsage);
    }

    #[test]
    fn test_canned_replies_need_exact_match() {
        let interp = interpreter();
        assert_eq!(interp.parse("Hello"), Command::Canned(replies::GREETING));
        assert_eq!(interp.parse(" sup "), Command::Canned(replies::GREETING));
        assert_eq!(
            interp.parse("What can you do?"),
            Command::Canned(replies::CAPABILITIES)
        );
        assert_eq!(
            interp.parse("Log a task for tomorrow"),
            Command::Canned(replies::LOG_TASK_PROMPT)
        );
        assert_eq!(
            interp.parse("hello there"),
            Command::Converse(ToolRoute::Plain)
        );
    }

    #[test]
    fn test_tool_routes() {
        let interp = interpreter();
        assert_eq!(
            interp.parse("Draw me a logo"),
            Command::Converse(ToolRoute::Image)
        );
        assert_eq!(
            interp.parse("Any NEWS on Tesla?"),
            Command::Converse(ToolRoute::Search)
        );
        // Both trigger sets present: image wins
        assert_eq!(
            interp.parse("search for a photo of the team"),
            Command::Converse(ToolRoute::Image)
        );
        assert_eq!(
            interp.parse("Schedule my meeting"),
            Command::Converse(ToolRoute::Plain)
        );
    }

    #[tokio::test]
    async fn test_interpret_presence_updates_router_and_board() {
        let interp = interpreter();
        let ajax = ajax(true).await;
        let status = StatusBoard::new(Mode::Assistant);

        let outcome = interp.interpret(&ajax, &status, "/loganout").await;
        assert_eq!(
            outcome,
            Outcome::Presence {
                present: false,
                reply: "Logan is away. Speaking on their behalf.".to_string(),
            }
        );
        assert!(!ajax.is_principal_present());
        assert_eq!(status.snapshot().await.mode, Mode::Principal);

        let outcome = interp.interpret(&ajax, &status, "/loganin").await;
        assert_eq!(
            outcome,
            Outcome::Presence {
                present: true,
                reply: "Logan is present. Switching to assistant mode.".to_string(),
            }
        );
        assert!(ajax.is_principal_present());
        assert_eq!(status.snapshot().await.mode, Mode::Assistant);
    }

    #[tokio::test]
    async fn test_interpret_delegation() {
        let interp = interpreter();
        let ajax = ajax(true).await;
        let status = StatusBoard::new(Mode::Assistant);

        let outcome = interp
            .interpret(&ajax, &status, "/delegate investor Analyze TSLA earnings")
            .await;
        let Outcome::Reply(reply) = outcome else {
            panic!("expected a reply");
        };
        assert!(reply.contains("[InvestorAgent]"));
        assert!(reply.contains("Analyze TSLA earnings"));

        let snapshot = status.snapshot().await;
        assert_eq!(snapshot.live_status, LiveStatus::Idle);
        assert_eq!(snapshot.current_task.as_deref(), Some("Analyze TSLA earnings"));
    }

    #[tokio::test]
    async fn test_interpret_unknown_agent_is_reported_as_text() {
        let interp = interpreter();
        let ajax = ajax(true).await;
        let status = StatusBoard::new(Mode::Assistant);

        let outcome = interp
            .interpret(&ajax, &status, "/delegate doesNotExist x")
            .await;
        let Outcome::Reply(reply) = outcome else {
            panic!("expected a reply");
        };
        assert!(reply.starts_with("Delegation error:"));
        assert!(reply.contains("doesNotExist"));
        assert_eq!(status.snapshot().await.live_status, LiveStatus::Idle);
    }

    #[tokio::test]
    async fn test_interpret_usage_and_conversation() {
        let interp = interpreter();
        let ajax = ajax(true).await;
        let status = StatusBoard::new(Mode::Assistant);

        assert_eq!(
            interp.interpret(&ajax, &status, "/delegate investor").await,
            Outcome::Reply("Usage: /delegate <agent> <task>".to_string())
        );
        assert_eq!(
            interp.interpret(&ajax, &status, "Schedule my meeting").await,
            Outcome::Converse(ToolRoute::Plain)
        );
        // Conversation never touches presence
        assert!(ajax.is_principal_present());
    }
}
