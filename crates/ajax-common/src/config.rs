//! Configuration types and utilities for Ajax
//!
//! Every section has a `Default`, so a config file only needs the keys it
//! wants to change. Binaries load the file (if any) and overlay CLI flags.

use crate::constants::{self, timeouts};
use crate::error::{AjaxError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AjaxConfig {
    /// Directory holding conversations, task log and queue
    pub data_dir: PathBuf,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
    pub principal: PrincipalConfig,
    pub memory: MemoryConfig,
    pub provider: ProviderConfig,
    pub tools: ToolsConfig,
    pub idle: IdleConfig,
    pub server: ServerConfig,
}

impl Default for AjaxConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            log_level: "info".to_string(),
            principal: PrincipalConfig::default(),
            memory: MemoryConfig::default(),
            provider: ProviderConfig::default(),
            tools: ToolsConfig::default(),
            idle: IdleConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AjaxConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AjaxError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML file if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config file at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AjaxConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the rest of the system cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.memory.cap == 0 {
            return Err(AjaxError::Config(
                "memory.cap must be at least 1".to_string(),
            ));
        }
        if self.principal.name.trim().is_empty() {
            return Err(AjaxError::Config(
                "principal.name must not be empty".to_string(),
            ));
        }
        if self.principal.name.chars().any(char::is_whitespace) {
            return Err(AjaxError::Config(
                "principal.name must be a single word".to_string(),
            ));
        }
        Ok(())
    }
}

/// The business owner Ajax assists or impersonates
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrincipalConfig {
    /// Lowercase token used in the presence commands (`/<name>in`, `/<name>out`)
    pub name: String,
    /// Name used in acknowledgements
    pub display_name: String,
    /// Caller identities that imply the principal is present
    pub usernames: Vec<String>,
}

impl Default for PrincipalConfig {
    fn default() -> Self {
        Self {
            name: constants::DEFAULT_PRINCIPAL_NAME.to_string(),
            display_name: constants::DEFAULT_PRINCIPAL_DISPLAY_NAME.to_string(),
            usernames: Vec::new(),
        }
    }
}

/// Rolling conversation memory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Maximum messages kept per conversation
    pub cap: usize,
    /// Instruction string for conversations that have none
    pub default_instructions: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            cap: constants::DEFAULT_MEMORY_CAP,
            default_instructions: constants::DEFAULT_INSTRUCTIONS.to_string(),
        }
    }
}

/// Completion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Model name passed to the provider; no model means replies are framed
    /// locally by the router
    pub model: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Extra system prompt prepended to every request
    pub system_prompt: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: None,
            timeout_seconds: timeouts::DEFAULT_PROVIDER_TIMEOUT,
            system_prompt: None,
        }
    }
}

/// Image and search tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub image_enabled: bool,
    pub search_enabled: bool,
    /// Number of search results folded into a reply
    pub search_results: usize,
    /// Image size requested from the image API
    pub image_size: String,
    pub timeout_seconds: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            image_enabled: false,
            search_enabled: false,
            search_results: 3,
            image_size: "1024x1024".to_string(),
            timeout_seconds: timeouts::DEFAULT_TOOL_TIMEOUT,
        }
    }
}

/// Background housekeeping while the principal is away
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    pub enabled: bool,
    pub frequency_minutes: u64,
    pub scan_social_comments: bool,
    pub review_spreadsheets: bool,
    pub read_financial_sites: bool,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            frequency_minutes: constants::idle::DEFAULT_FREQUENCY_MINUTES,
            scan_social_comments: false,
            review_spreadsheets: false,
            read_financial_sites: false,
        }
    }
}

/// HTTP server binding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}
