//! The personality router
//!
//! `Ajax` owns the presence flag, the personality store and the agent
//! registry. While the principal is present it answers as their assistant;
//! while they are away it speaks as them. Replies produced here are pure
//! framing: the prompt is never interpreted. Calls to a real completion
//! provider happen in the chat layer that wraps the router.

use crate::agents::{Agent, AgentRegistry};
use crate::personality::{Personality, PersonalityStore};
use ajax_common::{Mode, Result, personalities};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

pub struct Ajax {
    is_principal_present: AtomicBool,
    personalities: PersonalityStore,
    assistant: Personality,
    principal: Personality,
    registry: Arc<AgentRegistry>,
}

impl Ajax {
    /// Build a router; both the assistant and principal personalities must
    /// be in the store.
    pub fn new(
        store: PersonalityStore,
        registry: Arc<AgentRegistry>,
        is_principal_present: bool,
    ) -> Result<Self> {
        let assistant = store.get(personalities::ASSISTANT)?.clone();
        let principal = store.get(personalities::PRINCIPAL)?.clone();
        Ok(Self {
            is_principal_present: AtomicBool::new(is_principal_present),
            personalities: store,
            assistant,
            principal,
            registry,
        })
    }

    pub fn is_principal_present(&self) -> bool {
        self.is_principal_present.load(Ordering::SeqCst)
    }

    pub fn set_principal_present(&self, present: bool) {
        let previous = self.is_principal_present.swap(present, Ordering::SeqCst);
        if previous != present {
            debug!("Presence changed: {} -> {}", previous, present);
        }
    }

    pub fn mode(&self) -> Mode {
        Mode::from_presence(self.is_principal_present())
    }

    /// The personality for the current presence state
    pub fn active_personality(&self) -> &Personality {
        self.personality_for(self.mode())
    }

    pub fn personality_for(&self, mode: Mode) -> &Personality {
        match mode {
            Mode::Assistant => &self.assistant,
            Mode::Principal => &self.principal,
        }
    }

    pub fn personalities(&self) -> &PersonalityStore {
        &self.personalities
    }

    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    /// Frame `prompt` in the active personality's voice
    pub fn generate_response(&self, prompt: &str) -> String {
        self.frame(self.mode(), prompt)
    }

    /// Frame `prompt` for an explicit mode
    pub fn frame(&self, mode: Mode, prompt: &str) -> String {
        let lead_in = PersonalityStore::choose_lead_in(self.personality_for(mode));
        match mode {
            Mode::Assistant => format!("{} — {}", lead_in, prompt),
            Mode::Principal => format!("{} {}", lead_in, prompt),
        }
    }

    /// Hand `task` to a registered agent
    pub async fn delegate(&self, name: &str, task: &str) -> Result<String> {
        self.registry.delegate(name, task).await
    }
}

#[async_trait]
impl Agent for Ajax {
    fn name(&self) -> &str {
        "Ajax"
    }

    async fn handle_task(&self, task: &str) -> Result<String> {
        Ok(self.generate_response(task))
    }
}
