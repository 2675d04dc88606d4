//! Ajax Common Error Types
//!
//! Centralized error handling for all Ajax components

use std::fmt;

/// Main error type for Ajax operations
#[derive(Debug)]
pub enum AjaxError {
    /// Empty or whitespace-only input rejected at the boundary
    EmptyInput,
    /// Delegation to a name that is not in the registry
    UnknownAgent(String),
    /// Registration under a name that is already taken
    DuplicateName(String),
    /// Lookup of a missing entity (personality, conversation, ...)
    NotFound(String),
    /// Completion provider failure (network, auth, quota, timeout)
    Provider(String),
    /// Tool invocation failure (search, image generation)
    Tool(String),
    /// Failure raised inside a delegated agent
    Agent(String),
    /// Persistence errors
    Storage(String),
    /// Configuration errors
    Config(String),
    /// IO-related errors
    Io(std::io::Error),
    /// Serialization/deserialization errors
    Serde(serde_json::Error),
}

impl fmt::Display for AjaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AjaxError::EmptyInput => write!(f, "Empty message"),
            AjaxError::UnknownAgent(name) => {
                write!(f, "No agent registered under name '{}'", name)
            }
            AjaxError::DuplicateName(name) => write!(f, "Agent '{}' is already registered", name),
            AjaxError::NotFound(what) => write!(f, "{} not found", what),
            AjaxError::Provider(msg) => write!(f, "Provider error: {}", msg),
            AjaxError::Tool(msg) => write!(f, "Tool error: {}", msg),
            AjaxError::Agent(msg) => write!(f, "Agent error: {}", msg),
            AjaxError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AjaxError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AjaxError::Io(err) => write!(f, "IO error: {}", err),
            AjaxError::Serde(err) => write!(f, "Serialization error: {}", err),
        }
    }
}

impl std::error::Error for AjaxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AjaxError::Io(err) => Some(err),
            AjaxError::Serde(err) => Some(err),
            _ => None,
        }
    }
}

/// Convenience result type for Ajax operations
pub type Result<T> = std::result::Result<T, AjaxError>;

impl From<std::io::Error> for AjaxError {
    fn from(err: std::io::Error) -> Self {
        AjaxError::Io(err)
    }
}

impl From<serde_json::Error> for AjaxError {
    fn from(err: serde_json::Error) -> Self {
        AjaxError::Serde(err)
    }
}

impl From<toml::de::Error> for AjaxError {
    fn from(err: toml::de::Error) -> Self {
        AjaxError::Config(err.to_string())
    }
}
