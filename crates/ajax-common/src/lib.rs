//! Ajax Common - Shared utilities and types
//!
//! This crate provides the error taxonomy, configuration structs,
//! constants and utility functions used across all Ajax components.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::{
    AjaxConfig, IdleConfig, MemoryConfig, PrincipalConfig, ProviderConfig, ServerConfig,
    ToolsConfig,
};
pub use constants::*;
pub use error::{AjaxError, Result};
pub use types::{LiveStatus, Mode, Role};
pub use utils::*;
