use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, Flag, Parent};

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer value.
    Int(i64),
    /// A text value.
    Text(String),
    /// A containment reference.
    Parent(Parent),
}

impl Value {
    /// The type tag of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Bool(_) => ValueType::Bool,
            Self::Int(_) => ValueType::Int,
            Self::Text(_) => ValueType::Text,
            Self::Parent(_) => ValueType::Parent,
        }
    }

    /// The integer payload, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean payload, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Parent(p) => write!(f, "{p}"),
        }
    }
}

/// The type tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    /// Boolean.
    Bool,
    /// Integer.
    Int,
    /// Text.
    Text,
    /// Containment reference.
    Parent,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Text => write!(f, "text"),
            Self::Parent => write!(f, "parent"),
        }
    }
}

/// The closed set of attributes a [`StateChange`] may target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    /// A boolean flag on the entity.
    Flag(Flag),
    /// The entity's containment.
    Parent,
    /// The global score. Targets the player entity.
    Score,
    /// The global move counter. Targets the player entity.
    Moves,
    /// A custom item property holding a bool, int or text value.
    Property(String),
}

impl Attribute {
    /// Whether a value has a type this attribute accepts.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Flag(_) => value.value_type() == ValueType::Bool,
            Self::Parent => value.value_type() == ValueType::Parent,
            Self::Score | Self::Moves => value.value_type() == ValueType::Int,
            Self::Property(_) => value.value_type() != ValueType::Parent,
        }
    }

    /// Human-readable name of the accepted type, used in error messages.
    pub fn expected_type(&self) -> &'static str {
        match self {
            Self::Flag(_) => "bool",
            Self::Parent => "parent",
            Self::Score | Self::Moves => "int",
            Self::Property(_) => "bool, int or text",
        }
    }

    /// Whether the attribute is a world-level counter rather than entity data.
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Score | Self::Moves)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(flag) => write!(f, "flag:{flag}"),
            Self::Parent => write!(f, "parent"),
            Self::Score => write!(f, "score"),
            Self::Moves => write!(f, "moves"),
            Self::Property(name) => write!(f, "property:{name}"),
        }
    }
}

/// A single attributable mutation of the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    /// The entity being changed.
    pub entity: EntityId,
    /// The attribute being overwritten.
    pub attribute: Attribute,
    /// The value written.
    pub new_value: Value,
    /// The value before the change. Filled in on application when absent.
    pub old_value: Option<Value>,
}

impl StateChange {
    /// Create a change with no recorded prior value.
    pub fn new(entity: impl Into<EntityId>, attribute: Attribute, new_value: Value) -> Self {
        Self {
            entity: entity.into(),
            attribute,
            new_value,
            old_value: None,
        }
    }

    /// Set a flag on or off.
    pub fn set_flag(entity: impl Into<EntityId>, flag: Flag, on: bool) -> Self {
        Self::new(entity, Attribute::Flag(flag), Value::Bool(on))
    }

    /// Mark an entity as touched.
    pub fn touch(entity: impl Into<EntityId>) -> Self {
        Self::set_flag(entity, Flag::Touched, true)
    }

    /// Move an entity.
    pub fn move_to(entity: impl Into<EntityId>, parent: Parent) -> Self {
        Self::new(entity, Attribute::Parent, Value::Parent(parent))
    }

    /// Overwrite the score. The entity is the player.
    pub fn score(player: impl Into<EntityId>, score: i64) -> Self {
        Self::new(player, Attribute::Score, Value::Int(score))
    }

    /// Set a custom property.
    pub fn property(entity: impl Into<EntityId>, key: impl Into<String>, value: Value) -> Self {
        Self::new(entity, Attribute::Property(key.into()), value)
    }

    /// Record the prior value.
    pub fn with_old_value(mut self, old: Value) -> Self {
        self.old_value = Some(old);
        self
    }
}

/// A [`StateChange`] as it was applied, with its position in the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Zero-based position in the history.
    pub sequence: u64,
    /// Move counter at the time the change was applied.
    pub turn: u64,
    /// The applied change, with its prior value filled in.
    pub change: StateChange,
    /// When the change was applied.
    pub applied_at: DateTime<Utc>,
}

/// Append-only, ordered log of every applied [`StateChange`].
///
/// Entries are never removed or modified. Appending is only possible from
/// within this crate, through [`crate::World::apply`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeHistory {
    records: Vec<ChangeRecord>,
}

impl ChangeHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(
        &mut self,
        turn: u64,
        change: StateChange,
        applied_at: DateTime<Utc>,
    ) -> &ChangeRecord {
        let sequence = self.records.len() as u64;
        self.records.push(ChangeRecord {
            sequence,
            turn,
            change,
            applied_at,
        });
        &self.records[self.records.len() - 1]
    }

    /// All records in application order.
    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    /// Iterate records in application order.
    pub fn iter(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.records.iter()
    }

    /// The record at a sequence number.
    pub fn get(&self, sequence: u64) -> Option<&ChangeRecord> {
        usize::try_from(sequence)
            .ok()
            .and_then(|i| self.records.get(i))
    }

    /// The most recently applied record.
    pub fn last(&self) -> Option<&ChangeRecord> {
        self.records.last()
    }

    /// Records appended at or after a sequence number.
    pub fn since(&self, sequence: u64) -> &[ChangeRecord] {
        let start = usize::try_from(sequence)
            .unwrap_or(usize::MAX)
            .min(self.records.len());
        &self.records[start..]
    }

    /// Records touching the given entity.
    pub fn for_entity(&self, id: &EntityId) -> Vec<&ChangeRecord> {
        self.records.iter().filter(|r| &r.change.entity == id).collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been applied yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_type_checks() {
        assert!(Attribute::Flag(Flag::Touched).accepts(&Value::Bool(true)));
        assert!(!Attribute::Flag(Flag::Touched).accepts(&Value::Int(1)));
        assert!(Attribute::Parent.accepts(&Value::Parent(Parent::Player)));
        assert!(!Attribute::Parent.accepts(&Value::Text("cave".into())));
        assert!(Attribute::Score.accepts(&Value::Int(10)));
        assert!(Attribute::Property("size".into()).accepts(&Value::Text("big".into())));
        assert!(!Attribute::Property("size".into()).accepts(&Value::Parent(Parent::Nowhere)));
    }

    #[test]
    fn history_append_assigns_sequences() {
        let mut history = ChangeHistory::new();
        history.append(0, StateChange::touch("rock"), Utc::now());
        history.append(1, StateChange::touch("table"), Utc::now());

        assert_eq!(history.len(), 2);
        assert_eq!(history.get(0).map(|r| r.sequence), Some(0));
        assert_eq!(history.last().map(|r| r.turn), Some(1));
        assert_eq!(history.since(1).len(), 1);
        assert!(history.since(10).is_empty());
        assert_eq!(history.for_entity(&EntityId::from("rock")).len(), 1);
    }

    #[test]
    fn change_constructors() {
        let change = StateChange::touch("rock");
        assert_eq!(change.attribute, Attribute::Flag(Flag::Touched));
        assert_eq!(change.new_value, Value::Bool(true));
        assert!(change.old_value.is_none());

        let moved = StateChange::move_to("rock", Parent::Player).with_old_value(Value::Bool(false));
        assert_eq!(moved.old_value, Some(Value::Bool(false)));
    }
}
