//! Common types used across Ajax components

use serde::{Deserialize, Serialize};

/// Author of a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::System => write!(f, "system"),
        }
    }
}

/// Which personality is speaking
///
/// `Assistant` while the principal is present, `Principal` while Ajax speaks
/// on their behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Assistant,
    Principal,
}

impl Mode {
    pub fn from_presence(is_principal_present: bool) -> Self {
        if is_principal_present {
            Mode::Assistant
        } else {
            Mode::Principal
        }
    }

    pub fn is_principal_present(self) -> bool {
        matches!(self, Mode::Assistant)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Assistant => write!(f, "assistant"),
            Mode::Principal => write!(f, "principal"),
        }
    }
}

/// Whether Ajax is busy with a delegation or tool call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveStatus {
    Working,
    #[default]
    Idle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_follows_presence() {
        assert_eq!(Mode::from_presence(true), Mode::Assistant);
        assert_eq!(Mode::from_presence(false), Mode::Principal);
        assert!(Mode::Assistant.is_principal_present());
        assert!(!Mode::Principal.is_principal_present());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let status = serde_json::to_string(&LiveStatus::Working).unwrap();
        assert_eq!(status, "\"working\"");
    }
}
