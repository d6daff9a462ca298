//! The resolved command handed to the engine.

use serde::{Deserialize, Serialize};
use tw_core::EntityId;

/// A fully resolved player command.
///
/// Built once by the parser (or a test) and never modified afterwards; the
/// builder methods consume and return the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    verb: String,
    direct: Option<EntityId>,
    indirect: Option<EntityId>,
    raw: String,
    modifiers: Vec<String>,
}

impl Command {
    /// Create a command for a verb with no objects.
    pub fn new(verb: impl Into<String>) -> Self {
        let verb = verb.into().trim().to_lowercase();
        Self {
            raw: verb.clone(),
            verb,
            direct: None,
            indirect: None,
            modifiers: Vec::new(),
        }
    }

    /// Set the direct object.
    pub fn with_direct(mut self, id: impl Into<EntityId>) -> Self {
        self.direct = Some(id.into());
        self
    }

    /// Set the indirect object.
    pub fn with_indirect(mut self, id: impl Into<EntityId>) -> Self {
        self.indirect = Some(id.into());
        self
    }

    /// Add a modifier token such as a particle ("on", "with").
    pub fn with_modifier(mut self, word: impl Into<String>) -> Self {
        self.modifiers.push(word.into().to_lowercase());
        self
    }

    /// Set the raw input text.
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = raw.into();
        self
    }

    /// The verb token, lowercased.
    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// The verb as the player would see it at the start of a sentence.
    pub fn display_verb(&self) -> String {
        let mut chars = self.verb.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// The direct object, if resolved.
    pub fn direct(&self) -> Option<&EntityId> {
        self.direct.as_ref()
    }

    /// The indirect object, if resolved.
    pub fn indirect(&self) -> Option<&EntityId> {
        self.indirect.as_ref()
    }

    /// The text the player typed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Free-form modifier tokens, in input order.
    pub fn modifiers(&self) -> &[String] {
        &self.modifiers
    }

    /// Whether a modifier token is present.
    pub fn has_modifier(&self, word: &str) -> bool {
        self.modifiers.iter().any(|m| m.eq_ignore_ascii_case(word))
    }

    /// How many objects were resolved (0, 1 or 2).
    pub fn object_count(&self) -> usize {
        usize::from(self.direct.is_some()) + usize::from(self.indirect.is_some())
    }
}
