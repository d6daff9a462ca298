//! Syntax rules: the grammatical shapes a handler accepts.

use std::fmt;

use crate::command::Command;

/// One position in a [`SyntaxRule`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SyntaxToken {
    /// The verb itself.
    Verb,
    /// The direct object slot.
    Direct,
    /// The indirect object slot.
    Indirect,
    /// A literal word such as "on" or "with".
    Particle(String),
}

impl fmt::Display for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verb => write!(f, "VERB"),
            Self::Direct => write!(f, "DIRECT"),
            Self::Indirect => write!(f, "INDIRECT"),
            Self::Particle(word) => write!(f, "{}", word.to_uppercase()),
        }
    }
}

/// An object slot a rule requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// The direct object.
    Direct,
    /// The indirect object.
    Indirect,
}

/// An ordered token sequence describing one accepted command shape.
///
/// Rules are written as patterns: `"VERB"`, `"VERB DIRECT"`,
/// `"VERB ON DIRECT"`, `"VERB DIRECT WITH INDIRECT"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntaxRule {
    tokens: Vec<SyntaxToken>,
}

impl SyntaxRule {
    /// Parse a pattern. Upper-case `VERB`, `DIRECT` and `INDIRECT` are slots;
    /// every other word is a particle.
    pub fn parse(pattern: &str) -> Result<Self, String> {
        let tokens = pattern
            .split_whitespace()
            .map(|word| match word {
                "VERB" => SyntaxToken::Verb,
                "DIRECT" => SyntaxToken::Direct,
                "INDIRECT" => SyntaxToken::Indirect,
                other => SyntaxToken::Particle(other.to_lowercase()),
            })
            .collect();
        let rule = Self { tokens };
        rule.check()?;
        Ok(rule)
    }

    /// Build a rule from tokens, checking its shape.
    pub fn from_tokens(tokens: Vec<SyntaxToken>) -> Result<Self, String> {
        let rule = Self { tokens };
        rule.check()?;
        Ok(rule)
    }

    fn check(&self) -> Result<(), String> {
        match self.tokens.first() {
            None => return Err("empty pattern".into()),
            Some(SyntaxToken::Verb) => {}
            Some(other) => return Err(format!("pattern must start with VERB, found {other}")),
        }
        let count = |t: &SyntaxToken| self.tokens.iter().filter(|x| *x == t).count();
        if count(&SyntaxToken::Verb) != 1 {
            return Err("pattern must contain exactly one VERB".into());
        }
        if count(&SyntaxToken::Direct) > 1 || count(&SyntaxToken::Indirect) > 1 {
            return Err("object slots may appear at most once".into());
        }
        if self.wants_indirect() && !self.wants_direct() {
            return Err("INDIRECT requires DIRECT".into());
        }
        Ok(())
    }

    /// The tokens in order.
    pub fn tokens(&self) -> &[SyntaxToken] {
        &self.tokens
    }

    /// Whether the rule has a direct object slot.
    pub fn wants_direct(&self) -> bool {
        self.tokens.contains(&SyntaxToken::Direct)
    }

    /// Whether the rule has an indirect object slot.
    pub fn wants_indirect(&self) -> bool {
        self.tokens.contains(&SyntaxToken::Indirect)
    }

    /// The particle words, in order.
    pub fn particles(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|t| match t {
            SyntaxToken::Particle(word) => Some(word.as_str()),
            _ => None,
        })
    }

    /// Number of object slots.
    pub fn slot_count(&self) -> usize {
        usize::from(self.wants_direct()) + usize::from(self.wants_indirect())
    }

    /// Whether a command has the shape of this rule.
    ///
    /// Every particle must be present among the command's modifiers and the
    /// command may not fill a slot the rule lacks. Empty slots are allowed
    /// here and reported by [`SyntaxRule::missing_slot`].
    pub fn matches(&self, command: &Command) -> bool {
        if command.direct().is_some() && !self.wants_direct() {
            return false;
        }
        if command.indirect().is_some() && !self.wants_indirect() {
            return false;
        }
        self.particles().all(|p| command.has_modifier(p))
    }

    /// The first slot the rule requires that the command leaves empty.
    pub fn missing_slot(&self, command: &Command) -> Option<Slot> {
        if self.wants_direct() && command.direct().is_none() {
            Some(Slot::Direct)
        } else if self.wants_indirect() && command.indirect().is_none() {
            Some(Slot::Indirect)
        } else {
            None
        }
    }
}

impl fmt::Display for SyntaxRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words: Vec<String> = self.tokens.iter().map(ToString::to_string).collect();
        write!(f, "{}", words.join(" "))
    }
}
