//! Named response styles
//!
//! A personality is pure data: a description that seeds the system prompt and
//! an ordered list of example phrases. The first phrase is the lead-in used
//! when Ajax frames a reply itself.

use ajax_common::{AjaxError, Result, personalities};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named response style
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personality {
    id: String,
    description: String,
    example_phrases: Vec<String>,
}

impl Personality {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        example_phrases: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            example_phrases,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn example_phrases(&self) -> &[String] {
        &self.example_phrases
    }

    /// Deterministic lead-in: the first example phrase, or empty
    pub fn lead_in(&self) -> &str {
        self.example_phrases
            .first()
            .map(String::as_str)
            .unwrap_or("")
    }

    /// System instruction for a completion provider speaking in this voice
    pub fn system_instruction(&self) -> String {
        let mut instruction = format!("Personality: {}", self.description);
        if !self.example_phrases.is_empty() {
            instruction.push_str("\nExample phrases: ");
            instruction.push_str(&self.example_phrases.join(" | "));
        }
        instruction
    }
}

/// Read-only lookup of personalities by id
#[derive(Debug, Clone, Default)]
pub struct PersonalityStore {
    personalities: HashMap<String, Personality>,
}

impl PersonalityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a personality, replacing any previous one with the same id
    pub fn with(mut self, personality: Personality) -> Self {
        self.personalities
            .insert(personality.id().to_string(), personality);
        self
    }

    /// The assistant and principal personalities
    ///
    /// `principal_display_name` is woven into the descriptions so the
    /// provider knows whose voice it is using.
    pub fn with_defaults(principal_display_name: &str) -> Self {
        Self::new()
            .with(Personality::new(
                personalities::ASSISTANT,
                format!(
                    "Helpful, confident best friend. Casual, bold, smart and real; acts like \
                     {}'s right-hand person when they are present.",
                    principal_display_name
                ),
                vec![
                    "On it, boss!".to_string(),
                    "Got you.".to_string(),
                    "Here's what we'll do.".to_string(),
                    "Let me handle that while you crush the big stuff.".to_string(),
                    "I'll make it happen.".to_string(),
                ],
            ))
            .with(Personality::new(
                personalities::PRINCIPAL,
                format!(
                    "Speaks as {} in the first person. Direct, informal and competitive business \
                     owner. Speaks with authority, urgency and authenticity.",
                    principal_display_name
                ),
                vec![
                    "DM me now and let's make it happen.".to_string(),
                    "Here's how we'll hit that 10K/month.".to_string(),
                    "I built this from zero, so can you.".to_string(),
                    "No gimmicks. Just results.".to_string(),
                ],
            ))
    }

    pub fn get(&self, id: &str) -> Result<&Personality> {
        self.personalities
            .get(id)
            .ok_or_else(|| AjaxError::NotFound(format!("Personality '{}'", id)))
    }

    /// Lead-in phrase for a personality
    pub fn choose_lead_in(personality: &Personality) -> &str {
        personality.lead_in()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.personalities.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.personalities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personalities.is_empty()
    }
}
