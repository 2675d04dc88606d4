//! Common constants used across Ajax

/// Default number of messages kept per conversation
pub const DEFAULT_MEMORY_CAP: usize = 20;

/// Number of recent replies kept on the status board
pub const STATUS_HISTORY_LEN: usize = 5;

/// Conversation used when the caller does not name one
pub const DEFAULT_CONVERSATION_ID: &str = "general";

/// Instruction string attached to conversations that have none yet
pub const DEFAULT_INSTRUCTIONS: &str =
    "Keep replies short, direct and real. Never mention being a language model.";

/// Default principal, the business owner Ajax assists or speaks for
pub const DEFAULT_PRINCIPAL_NAME: &str = "logan";
pub const DEFAULT_PRINCIPAL_DISPLAY_NAME: &str = "Logan";

/// Personality ids
pub mod personalities {
    pub const ASSISTANT: &str = "ajax";
    pub const PRINCIPAL: &str = "principal";
}

/// Fixed reply strings produced by the command interpreter
pub mod replies {
    pub const DELEGATE_USAGE: &str = "Usage: /delegate <agent> <task>";
    pub const DELEGATION_ERROR_PREFIX: &str = "Delegation error: ";
    pub const ERROR_PREFIX: &str = "Error: ";
    pub const GREETING: &str = "Hey there! How can I help you today?";
    pub const CAPABILITIES: &str =
        "I can help with business automation, content creation, research, task tracking and more.";
    pub const LOG_TASK_PROMPT: &str = "Sure! Please provide the task details so I can log it.";
    pub const IMAGE_PREFIX: &str = "Here is your image: ";
}

/// Substring triggers for tool routing, matched against the lowercased message
pub mod triggers {
    pub const IMAGE: &[&str] = &[
        "image",
        "picture",
        "photo",
        "draw",
        "generate image",
        "create image",
    ];
    pub const SEARCH: &[&str] = &[
        "search",
        "look up",
        "get latest info",
        "news",
        "research",
        "web",
    ];
}

/// Exact-match canned phrases
pub mod canned {
    pub const GREETINGS: &[&str] = &["hey", "hi", "hello", "what's up", "sup"];
    pub const CAPABILITY_QUESTIONS: &[&str] = &["what can you do", "what can you do?"];
    pub const LOG_TASK_PREFIX: &str = "log a task";
}

/// File names inside the data directory
pub mod files {
    pub const CONVERSATIONS_DIR: &str = "conversations";
    pub const TASK_LOG: &str = "tasklog.jsonl";
    pub const TASK_QUEUE: &str = "queue.json";
    pub const IDLE_BEHAVIORS: &str = "idle_behaviors.json";
    pub const AGENT_STATE: &str = "agent_state.json";
}

/// Default timeout values in seconds
pub mod timeouts {
    pub const DEFAULT_PROVIDER_TIMEOUT: u64 = 120;
    pub const DEFAULT_TOOL_TIMEOUT: u64 = 60;
}

/// Idle behaviour defaults
pub mod idle {
    pub const DEFAULT_FREQUENCY_MINUTES: u64 = 30;
    pub const MIN_FREQUENCY_MINUTES: u64 = 1;
    /// One week
    pub const MAX_FREQUENCY_MINUTES: u64 = 7 * 24 * 60;
}
