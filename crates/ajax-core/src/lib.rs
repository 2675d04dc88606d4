//! Ajax Core - dual-personality assistant
//!
//! This crate provides the core functionality for the Ajax system, including:
//! - Personality store and the presence-driven router
//! - Agent registry with stub and action agents for delegation
//! - Command interpretation for chat input
//! - Rolling, per-conversation memory with pluggable persistence
//! - Task log, task queue and the in-memory status board
//! - Completion provider and tool collaborators
//! - The chat orchestrator tying it all together

pub mod agents;
pub mod chat;
pub mod commands;
pub mod idle;
pub mod llm;
pub mod memory;
pub mod personality;
pub mod presence;
pub mod router;
pub mod status;
pub mod store;
pub mod tasks;
pub mod tools;

// Re-export key types for convenience
pub use agents::{Agent, AgentRegistry, build_default_registry};
pub use chat::{ChatReply, ChatService, ChatServiceBuilder};
pub use commands::{Command, CommandInterpreter, ToolRoute};
pub use idle::{IdleSettings, IdleWorker};
pub use llm::{CompletionProvider, GenaiProvider, PromptMessage};
pub use memory::{ConversationMemory, ConversationMessage, ConversationRecord};
pub use personality::{Personality, PersonalityStore};
pub use presence::{AgentState, PresenceStore};
pub use router::Ajax;
pub use status::{StatusBoard, StatusSnapshot};
pub use store::{ConversationStore, InMemoryConversationStore, JsonFileConversationStore};
pub use tasks::{TaskEntry, TaskLog, TaskLogEntry, TaskQueue, TaskStatus};
pub use tools::{DDGSearchTool, ImageGenerator, OpenAiImageTool, SearchResult, WebSearch};
