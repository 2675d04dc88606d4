//! Chat orchestration
//!
//! [`ChatService`] is the one entry point the binaries talk to. A chat turn
//! runs the command interpreter; directives answer directly, everything else
//! goes to the reply engine: the completion provider when one is configured
//! (personality instruction + trailing memory + the new message), otherwise
//! the router's own framing. Image and search triggers detour through the
//! matching tool first.
//!
//! Every turn is appended to conversation memory, the task log and the
//! status history. Those writes are best-effort: a failure is logged and the
//! reply still goes out.

use crate::agents::{AgentRegistry, ConfiguredAgent, build_default_registry};
use crate::commands::{CommandInterpreter, Outcome, ToolRoute};
use crate::idle::IdleSettings;
use crate::llm::{CompletionProvider, GenaiProvider, PromptMessage};
use crate::memory::{ConversationMemory, ConversationMessage};
use crate::personality::PersonalityStore;
use crate::presence::PresenceStore;
use crate::router::Ajax;
use crate::status::{StatusBoard, StatusSnapshot};
use crate::store::{ConversationStore, InMemoryConversationStore, JsonFileConversationStore};
use crate::tasks::{TaskEntry, TaskLog, TaskLogEntry, TaskQueue, TaskStatus};
use crate::tools::{
    DDGSearchTool, ImageGenerator, OpenAiImageTool, WebSearch, format_results,
};
use ajax_common::{
    AjaxConfig, AjaxError, DEFAULT_CONVERSATION_ID, IdleConfig, Mode, Result, Role,
    current_timestamp, files, replies,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Reply to one chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub timestamp: String,
}

pub struct ChatService {
    ajax: Arc<Ajax>,
    interpreter: CommandInterpreter,
    status: Arc<StatusBoard>,
    memory: ConversationMemory,
    task_log: TaskLog,
    queue: Arc<TaskQueue>,
    idle: Arc<IdleSettings>,
    presence: PresenceStore,
    provider: Option<Arc<dyn CompletionProvider>>,
    image_tool: Option<Arc<dyn ImageGenerator>>,
    search_tool: Option<Arc<dyn WebSearch>>,
    principal_usernames: Vec<String>,
    search_results: usize,
    provider_timeout: Duration,
    tool_timeout: Duration,
}

/// Bound a provider or tool call; a timeout becomes an error of `kind`
async fn bounded<T, F>(limit: Duration, kind: fn(String) -> AjaxError, what: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(kind(format!(
            "{} timed out after {}s",
            what,
            limit.as_secs()
        ))),
    }
}

impl ChatService {
    pub fn builder(config: AjaxConfig) -> ChatServiceBuilder {
        ChatServiceBuilder::new(config)
    }

    pub fn router(&self) -> &Arc<Ajax> {
        &self.ajax
    }

    pub fn registry(&self) -> &Arc<AgentRegistry> {
        self.ajax.registry()
    }

    pub fn status_board(&self) -> &Arc<StatusBoard> {
        &self.status
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn queue(&self) -> &Arc<TaskQueue> {
        &self.queue
    }

    pub fn idle_settings(&self) -> &Arc<IdleSettings> {
        &self.idle
    }

    /// Handle a message from an anonymous caller
    pub async fn chat(&self, conversation_id: Option<&str>, message: &str) -> Result<ChatReply> {
        self.chat_as(conversation_id, message, None).await
    }

    /// Handle a message, letting a known principal identity mark them present
    ///
    /// The identity override applies before the message is interpreted, so a
    /// presence command in the same message still has the last word.
    pub async fn chat_as(
        &self,
        conversation_id: Option<&str>,
        message: &str,
        caller: Option<&str>,
    ) -> Result<ChatReply> {
        let text = message.trim();
        if text.is_empty() {
            return Err(AjaxError::EmptyInput);
        }
        let id = conversation_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(DEFAULT_CONVERSATION_ID);

        if let Some(caller) = caller {
            if self.is_principal(caller) && !self.ajax.is_principal_present() {
                debug!("Caller {} is the principal, switching to assistant mode", caller);
                self.set_principal_present(true).await;
            }
        }

        self.status.set_last_command(text).await;
        let reply = match self.interpreter.interpret(&self.ajax, &self.status, text).await {
            Outcome::Reply(reply) => reply,
            Outcome::Presence { present, reply } => {
                self.record_mode_switch(present).await;
                reply
            }
            Outcome::Converse(route) => {
                self.status.set_current_task(text).await;
                self.converse(id, text, route).await
            }
        };

        let timestamp = current_timestamp();
        self.record_turn(id, text, &reply, &timestamp).await;
        Ok(ChatReply { reply, timestamp })
    }

    fn is_principal(&self, caller: &str) -> bool {
        let caller = caller.trim().to_lowercase();
        !caller.is_empty() && self.principal_usernames.iter().any(|u| *u == caller)
    }

    async fn converse(&self, id: &str, text: &str, route: ToolRoute) -> String {
        match route {
            ToolRoute::Image => {
                if let Some(tool) = &self.image_tool {
                    return match self.run_image(tool.as_ref(), text).await {
                        Ok(url) => format!("{}{}", replies::IMAGE_PREFIX, url),
                        Err(e) => tool_error(e),
                    };
                }
            }
            ToolRoute::Search => {
                if let Some(tool) = &self.search_tool {
                    self.status.begin_work(None, text).await;
                    let found = bounded(
                        self.tool_timeout,
                        AjaxError::Tool,
                        "Search",
                        tool.search(text, self.search_results),
                    )
                    .await;
                    self.status.finish_work().await;
                    return match found {
                        Ok(results) => {
                            debug!("Search returned {} results", results.len());
                            self.respond(id, text, Some(format_results(&results))).await
                        }
                        Err(e) => tool_error(e),
                    };
                }
            }
            ToolRoute::Plain => {}
        }
        self.respond(id, text, None).await
    }

    async fn run_image(&self, tool: &dyn ImageGenerator, prompt: &str) -> Result<String> {
        self.status.begin_work(None, prompt).await;
        let result = bounded(
            self.tool_timeout,
            AjaxError::Tool,
            "Image generation",
            tool.generate(prompt),
        )
        .await;
        self.status.finish_work().await;
        result
    }

    /// Reply engine for plain conversation
    async fn respond(&self, id: &str, text: &str, search_context: Option<String>) -> String {
        let Some(provider) = &self.provider else {
            let framed = self.ajax.generate_response(text);
            return match search_context {
                Some(results) => format!("{}\n\n{}", framed, results),
                None => framed,
            };
        };

        let prompt = match self.build_prompt(id, text, search_context).await {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!("Failed to load conversation {}: {}", id, e);
                return tool_error(e);
            }
        };

        self.status.begin_work(None, text).await;
        let completion = bounded(
            self.provider_timeout,
            AjaxError::Provider,
            "Completion",
            provider.complete(&prompt),
        )
        .await;
        self.status.finish_work().await;

        match completion {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Completion failed: {}", e);
                tool_error(e)
            }
        }
    }

    async fn build_prompt(
        &self,
        id: &str,
        text: &str,
        search_context: Option<String>,
    ) -> Result<Vec<PromptMessage>> {
        let record = self.memory.record(id).await?;
        let mut system = self.ajax.active_personality().system_instruction();
        if !record.instructions.trim().is_empty() {
            system.push_str("\n\n");
            system.push_str(record.instructions.trim());
        }

        let mut prompt = vec![PromptMessage::system(system)];
        if let Some(results) = search_context {
            prompt.push(PromptMessage::system(format!(
                "Web search results for the next message:\n{}",
                results
            )));
        }
        prompt.extend(
            record
                .messages
                .into_iter()
                .map(|m| PromptMessage::new(m.role, m.content)),
        );
        prompt.push(PromptMessage::user(text));
        Ok(prompt)
    }

    async fn record_turn(&self, id: &str, text: &str, reply: &str, timestamp: &str) {
        let turn = vec![
            ConversationMessage::at(Role::User, text, timestamp),
            ConversationMessage::at(Role::Assistant, reply, timestamp),
        ];
        if let Err(e) = self.memory.append_all(id, turn).await {
            warn!("Failed to save conversation {}: {}", id, e);
        }

        let entry = TaskLogEntry {
            timestamp: timestamp.to_string(),
            task: text.to_string(),
            response: reply.to_string(),
        };
        if let Err(e) = self.task_log.append(entry).await {
            warn!("Failed to append task log: {}", e);
        }

        self.status.push_history(reply).await;
    }

    /// Delegate directly, surfacing lookup failures as errors
    pub async fn delegate(&self, agent: &str, task: &str) -> Result<String> {
        let task = task.trim();
        if task.is_empty() {
            return Err(AjaxError::EmptyInput);
        }
        self.status.begin_work(Some(agent), task).await;
        let result = self.ajax.delegate(agent, task).await;
        self.status.finish_work().await;

        if let Ok(reply) = &result {
            self.status.push_history(reply.clone()).await;
        }
        result
    }

    /// Run a named action on an agent
    pub async fn run_action(&self, agent: &str, action: &str, payload: Option<&str>) -> Result<String> {
        let action = action.trim();
        if action.is_empty() {
            return Err(AjaxError::EmptyInput);
        }
        self.status.begin_work(Some(agent), action).await;
        let result = self.registry().run(agent, action, payload).await;
        self.status.finish_work().await;
        result
    }

    pub async fn list_agents(&self) -> Vec<String> {
        self.registry().list().await
    }

    /// Register a placeholder agent built from a capability list
    pub async fn register_agent(&self, name: &str, capabilities: Vec<String>) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AjaxError::EmptyInput);
        }
        let capabilities: Vec<String> = capabilities
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        self.registry()
            .register(name, ConfiguredAgent::new(name, capabilities))
            .await?;
        info!("Registered agent {}", name);
        Ok(())
    }

    pub async fn status(&self) -> StatusSnapshot {
        self.status.snapshot().await
    }

    pub fn mode(&self) -> Mode {
        self.ajax.mode()
    }

    pub async fn set_principal_present(&self, present: bool) {
        self.ajax.set_principal_present(present);
        self.status.set_mode(Mode::from_presence(present)).await;
        self.record_mode_switch(present).await;
    }

    /// Persist the mode and note the switch in the queue
    async fn record_mode_switch(&self, present: bool) {
        let mode = Mode::from_presence(present);
        if let Err(e) = self.presence.save(mode).await {
            warn!("Failed to persist mode {}: {}", mode, e);
        }
        let label = match mode {
            Mode::Assistant => "Ajax",
            Mode::Principal => self.interpreter.principal_display_name(),
        };
        if let Err(e) = self
            .queue
            .push(&format!("Switched mode to {}", label), TaskStatus::Done)
            .await
        {
            warn!("Failed to record mode switch: {}", e);
        }
    }

    /// Queue a pending task; the task log gets a matching entry
    pub async fn queue_task(&self, task: &str) -> Result<TaskEntry> {
        let entry = self.queue.enqueue(task).await?;
        let logged = TaskLogEntry::new(&entry.description, format!("Queued task #{}", entry.id));
        if let Err(e) = self.task_log.append(logged).await {
            warn!("Failed to append task log: {}", e);
        }
        Ok(entry)
    }

    pub async fn tasks(&self) -> Result<Vec<TaskEntry>> {
        self.queue.list().await
    }

    pub async fn task_log(&self) -> Result<Vec<TaskLogEntry>> {
        self.task_log.entries().await
    }

    /// Generate an image outside of chat
    pub async fn generate_image(&self, prompt: &str) -> Result<String> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AjaxError::EmptyInput);
        }
        let tool = self
            .image_tool
            .as_ref()
            .ok_or_else(|| AjaxError::Tool("Image generation is not configured".to_string()))?;
        let url = self.run_image(tool.as_ref(), prompt).await?;
        self.status
            .push_history(format!("Generated image: {}", url))
            .await;
        Ok(url)
    }

    pub async fn idle_config(&self) -> IdleConfig {
        self.idle.get().await
    }

    /// Store new idle settings and note the change in the queue
    pub async fn set_idle_config(&self, config: IdleConfig) -> Result<IdleConfig> {
        let stored = self.idle.set(config).await?;
        if let Err(e) = self
            .queue
            .push("Updated idle behaviours configuration", TaskStatus::Done)
            .await
        {
            warn!("Failed to record idle settings change: {}", e);
        }
        Ok(stored)
    }
}

fn tool_error(e: AjaxError) -> String {
    format!("{}{}", replies::ERROR_PREFIX, e)
}

/// Assembles a [`ChatService`] from configuration plus optional overrides
pub struct ChatServiceBuilder {
    config: AjaxConfig,
    persist: bool,
    principal_present: Option<bool>,
    registry: Option<Arc<AgentRegistry>>,
    store: Option<Arc<dyn ConversationStore>>,
    provider: Option<Arc<dyn CompletionProvider>>,
    image_tool: Option<Arc<dyn ImageGenerator>>,
    search_tool: Option<Arc<dyn WebSearch>>,
    configured_collaborators: bool,
}

impl ChatServiceBuilder {
    pub fn new(config: AjaxConfig) -> Self {
        Self {
            config,
            persist: true,
            principal_present: None,
            registry: None,
            store: None,
            provider: None,
            image_tool: None,
            search_tool: None,
            configured_collaborators: false,
        }
    }

    /// Keep conversations, the task log, the queue and idle settings in
    /// memory instead of under `data_dir`
    pub fn in_memory(mut self) -> Self {
        self.persist = false;
        self
    }

    /// Start with this presence instead of the saved one
    pub fn principal_present(mut self, present: bool) -> Self {
        self.principal_present = Some(present);
        self
    }

    pub fn with_registry(mut self, registry: Arc<AgentRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn ConversationStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_image_tool(mut self, tool: Arc<dyn ImageGenerator>) -> Self {
        self.image_tool = Some(tool);
        self
    }

    pub fn with_search_tool(mut self, tool: Arc<dyn WebSearch>) -> Self {
        self.search_tool = Some(tool);
        self
    }

    /// Fill unset collaborators from the config: a genai provider when a
    /// model is named, and the tools that are enabled
    pub fn with_configured_collaborators(mut self) -> Self {
        self.configured_collaborators = true;
        self
    }

    fn resolve_collaborators(&mut self) {
        if self.provider.is_none() {
            if let Some(model) = &self.config.provider.model {
                info!("Using completion model {}", model);
                let provider = GenaiProvider::new(model.clone())
                    .with_system_prompt(self.config.provider.system_prompt.clone());
                self.provider = Some(Arc::new(provider));
            }
        }
        if self.image_tool.is_none() && self.config.tools.image_enabled {
            match OpenAiImageTool::from_env(self.config.tools.image_size.clone()) {
                Ok(tool) => self.image_tool = Some(Arc::new(tool)),
                Err(e) => warn!("Image tool disabled: {}", e),
            }
        }
        if self.search_tool.is_none() && self.config.tools.search_enabled {
            self.search_tool = Some(Arc::new(DDGSearchTool::new()));
        }
    }

    pub async fn build(mut self) -> Result<ChatService> {
        self.config.validate()?;
        if self.configured_collaborators {
            self.resolve_collaborators();
        }

        let config = &self.config;
        let registry = match self.registry.take() {
            Some(registry) => registry,
            None => Arc::new(build_default_registry().await?),
        };
        let data_dir = &config.data_dir;
        let presence = if self.persist {
            PresenceStore::open(data_dir.join(files::AGENT_STATE))
        } else {
            PresenceStore::in_memory()
        };
        let present = match self.principal_present {
            Some(present) => present,
            None => presence
                .load()
                .await?
                .map(|state| state.mode.is_principal_present())
                .unwrap_or(true),
        };

        let personalities = PersonalityStore::with_defaults(&config.principal.display_name);
        let ajax = Arc::new(Ajax::new(personalities, registry, present)?);
        let interpreter =
            CommandInterpreter::new(&config.principal.name, &config.principal.display_name);
        let status = Arc::new(StatusBoard::new(ajax.mode()));

        let store: Arc<dyn ConversationStore> = match self.store.take() {
            Some(store) => store,
            None if self.persist => Arc::new(
                JsonFileConversationStore::open(data_dir.join(files::CONVERSATIONS_DIR)).await?,
            ),
            None => Arc::new(InMemoryConversationStore::new()),
        };
        let memory = ConversationMemory::new(
            store,
            config.memory.cap,
            config.memory.default_instructions.clone(),
        );

        let (task_log, queue, idle) = if self.persist {
            (
                TaskLog::open(data_dir.join(files::TASK_LOG)),
                TaskQueue::open(data_dir.join(files::TASK_QUEUE)),
                IdleSettings::load(data_dir.join(files::IDLE_BEHAVIORS), config.idle.clone())
                    .await?,
            )
        } else {
            (
                TaskLog::in_memory(),
                TaskQueue::in_memory(),
                IdleSettings::in_memory(config.idle.clone()),
            )
        };

        let principal_usernames = config
            .principal
            .usernames
            .iter()
            .map(|u| u.trim().to_lowercase())
            .filter(|u| !u.is_empty())
            .collect();

        info!(
            "Chat service ready (mode: {}, provider: {}, persist: {})",
            ajax.mode(),
            if self.provider.is_some() { "on" } else { "off" },
            self.persist
        );

        Ok(ChatService {
            ajax,
            interpreter,
            status,
            memory,
            task_log,
            queue: Arc::new(queue),
            idle: Arc::new(idle),
            presence,
            provider: self.provider,
            image_tool: self.image_tool,
            search_tool: self.search_tool,
            principal_usernames,
            search_results: config.tools.search_results,
            provider_timeout: Duration::from_secs(config.provider.timeout_seconds),
            tool_timeout: Duration::from_secs(config.tools.timeout_seconds),
        })
    }
}
