//! Completion provider for conversational replies
//!
//! The chat layer builds a prompt list (system instruction, trailing memory
//! window, the new user message) and hands it to a [`CompletionProvider`].
//! [`GenaiProvider`] is the production implementation over the `genai`
//! client; tests plug in canned providers.

use ajax_common::{AjaxError, Result, Role};
use async_trait::async_trait;
use genai::Client as GenaiClient;
use genai::chat::{ChatMessage as GenaiChatMessage, ChatRequest, MessageContent};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One prompt entry sent to the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    fn to_genai(&self) -> GenaiChatMessage {
        match self.role {
            Role::System => GenaiChatMessage::system(&self.content),
            Role::User => GenaiChatMessage::user(&self.content),
            Role::Assistant => GenaiChatMessage::assistant(&self.content),
        }
    }
}

/// Prompt list in, reply text out
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String>;
}

/// `genai`-backed provider; the model name picks the backend and genai
/// reads the matching API key from the environment
pub struct GenaiProvider {
    client: GenaiClient,
    model: String,
    system_prompt: Option<String>,
}

impl GenaiProvider {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: GenaiClient::default(),
            model: model.into(),
            system_prompt: None,
        }
    }

    /// Extra system prompt sent ahead of the per-conversation instruction
    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt.filter(|p| !p.trim().is_empty());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionProvider for GenaiProvider {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String> {
        debug!(
            "Requesting completion from {} with {} messages",
            self.model,
            messages.len()
        );

        let genai_messages: Vec<GenaiChatMessage> =
            messages.iter().map(PromptMessage::to_genai).collect();
        let mut chat_req = ChatRequest::new(genai_messages);
        if let Some(prompt) = &self.system_prompt {
            chat_req = chat_req.with_system(prompt.clone());
        }

        let response = self
            .client
            .exec_chat(&self.model, chat_req, None)
            .await
            .map_err(|e| AjaxError::Provider(format!("GenAI API error: {}", e)))?;

        let content = response
            .content
            .first()
            .cloned()
            .ok_or_else(|| AjaxError::Provider("No content in chat response".to_string()))?;

        match content {
            MessageContent::Text(text) => {
                info!("Provider returned {} characters", text.len());
                Ok(text)
            }
            _ => Err(AjaxError::Provider(
                "Provider returned non-text content".to_string(),
            )),
        }
    }
}
