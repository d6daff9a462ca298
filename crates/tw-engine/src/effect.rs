use tw_core::{EntityId, World};

use crate::error::EngineResult;

/// A non-state consequence of an action, run after its changes are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// Raise a named event for interested runners.
    TriggerEvent {
        /// Event name, e.g. "noise".
        name: String,
        /// The entities involved.
        entities: Vec<EntityId>,
    },
    /// Start a countdown that fires after some number of turns.
    StartFuse {
        /// Fuse name.
        name: String,
        /// Turns until it fires.
        turns: u32,
    },
    /// Cancel a running countdown.
    StopFuse {
        /// Fuse name.
        name: String,
    },
}

impl SideEffect {
    /// Shorthand for [`SideEffect::TriggerEvent`].
    pub fn event(name: impl Into<String>, entities: Vec<EntityId>) -> Self {
        Self::TriggerEvent {
            name: name.into(),
            entities,
        }
    }

    /// The effect's name.
    pub fn name(&self) -> &str {
        match self {
            Self::TriggerEvent { name, .. }
            | Self::StartFuse { name, .. }
            | Self::StopFuse { name } => name,
        }
    }

    /// Check whether a given entity is involved in this effect.
    pub fn involves(&self, id: &EntityId) -> bool {
        match self {
            Self::TriggerEvent { entities, .. } => entities.contains(id),
            Self::StartFuse { .. } | Self::StopFuse { .. } => false,
        }
    }
}

/// A side effect as it was executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectRecord {
    /// The move counter when the effect ran.
    pub turn: u64,
    /// The effect.
    pub effect: SideEffect,
}

/// Receives side effects after each completed action.
///
/// Runners are invoked in registration order, once per effect, in the order
/// the action emitted them.
pub trait EffectRunner: std::fmt::Debug {
    /// Human-readable name for this runner.
    fn name(&self) -> &str;

    /// Handle one effect. Returned text is rendered to the player.
    fn run(&mut self, effect: &SideEffect, world: &World) -> EngineResult<Option<String>>;
}

/// Accumulates executed side effects.
#[derive(Debug, Default)]
pub struct EffectLog {
    records: Vec<EffectRecord>,
    max_records: usize,
}

impl EffectLog {
    /// Create a log with the given maximum capacity (0 = unlimited).
    pub fn new(max_records: usize) -> Self {
        Self {
            records: Vec::new(),
            max_records,
        }
    }

    /// Append a record, dropping the oldest when over capacity.
    pub fn push(&mut self, record: EffectRecord) {
        self.records.push(record);
        if self.max_records > 0 && self.records.len() > self.max_records {
            let overflow = self.records.len() - self.max_records;
            self.records.drain(..overflow);
        }
    }

    /// All recorded effects, oldest first.
    pub fn records(&self) -> &[EffectRecord] {
        &self.records
    }

    /// Effects that ran on the given turn.
    pub fn at_turn(&self, turn: u64) -> Vec<&EffectRecord> {
        self.records.iter().filter(|r| r.turn == turn).collect()
    }

    /// Effects involving the given entity.
    pub fn for_entity(&self, id: &EntityId) -> Vec<&EffectRecord> {
        self.records
            .iter()
            .filter(|r| r.effect.involves(id))
            .collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has run yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
