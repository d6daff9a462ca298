use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::change::Value;

/// Unique identifier for every entity in the world.
///
/// Identifiers are authored with the content ("rock", "cave") so that
/// commands, transcripts and replays stay readable and deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub String);

impl EntityId {
    /// Create an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&EntityId> for EntityId {
    fn from(value: &EntityId) -> Self {
        value.clone()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A physical object that can be acted upon.
    Item,
    /// A room or area the player can occupy.
    Location,
    /// The player character.
    Player,
}

impl EntityKind {
    /// Returns true for kinds that have a physical presence a command can touch.
    pub fn is_physical(self) -> bool {
        matches!(self, Self::Item | Self::Player)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item => write!(f, "item"),
            Self::Location => write!(f, "location"),
            Self::Player => write!(f, "player"),
        }
    }
}

/// A boolean capability or state tag on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    /// The player has physically interacted with the entity.
    Touched,
    /// The entity can be picked up.
    Takable,
    /// A location that is lit without any light source.
    Lit,
    /// The entity can provide light when switched on.
    LightSource,
    /// A device that is switched on.
    On,
    /// A container whose contents are reachable.
    Open,
    /// The entity can hold other items inside it.
    Container,
    /// Items can be placed on top of the entity.
    Surface,
    /// Contents are visible even when closed.
    Transparent,
    /// A person or creature rather than an inanimate object.
    Character,
    /// The entity has an edge that can cut things.
    Sharp,
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Touched => "touched",
            Self::Takable => "takable",
            Self::Lit => "lit",
            Self::LightSource => "light_source",
            Self::On => "on",
            Self::Open => "open",
            Self::Container => "container",
            Self::Surface => "surface",
            Self::Transparent => "transparent",
            Self::Character => "character",
            Self::Sharp => "sharp",
        };
        write!(f, "{name}")
    }
}

/// Where an entity currently is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parent {
    /// Not present anywhere in the world.
    #[default]
    Nowhere,
    /// Directly inside a location.
    Location(EntityId),
    /// Carried by the player.
    Player,
    /// Inside or on another item.
    Item(EntityId),
}

impl Parent {
    /// The entity this parent refers to, if it names one.
    pub fn entity(&self) -> Option<&EntityId> {
        match self {
            Self::Location(id) | Self::Item(id) => Some(id),
            Self::Nowhere | Self::Player => None,
        }
    }
}

impl fmt::Display for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nowhere => write!(f, "nowhere"),
            Self::Location(id) => write!(f, "location:{id}"),
            Self::Player => write!(f, "player"),
            Self::Item(id) => write!(f, "item:{id}"),
        }
    }
}

/// Core entity struct. Items, locations and the player are all entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier for this entity.
    pub id: EntityId,
    /// The kind (type) of this entity.
    pub kind: EntityKind,
    /// Display name of the entity.
    pub name: String,
    /// Free-text description of the entity.
    pub description: String,
    /// Extra nouns the player may use to refer to the entity.
    pub synonyms: Vec<String>,
    /// Boolean capability and state flags.
    pub flags: BTreeSet<Flag>,
    /// Where the entity is.
    pub parent: Parent,
    /// Typed custom properties.
    pub properties: BTreeMap<String, Value>,
}

impl Entity {
    /// Create a new entity of the given kind.
    pub fn new(id: impl Into<String>, kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(id),
            kind,
            name: name.into(),
            description: String::new(),
            synonyms: Vec::new(),
            flags: BTreeSet::new(),
            parent: Parent::Nowhere,
            properties: BTreeMap::new(),
        }
    }

    /// Create an item.
    pub fn item(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, EntityKind::Item, name)
    }

    /// Create a location.
    pub fn location(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, EntityKind::Location, name)
    }

    /// Create the player.
    pub fn player(id: impl Into<String>) -> Self {
        Self::new(id, EntityKind::Player, "yourself")
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a flag.
    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flags.insert(flag);
        self
    }

    /// Add an alternate noun.
    pub fn with_synonym(mut self, noun: impl Into<String>) -> Self {
        self.synonyms.push(noun.into());
        self
    }

    /// Place the entity.
    pub fn with_parent(mut self, parent: Parent) -> Self {
        self.parent = parent;
        self
    }

    /// Place the entity directly in a location.
    pub fn in_location(self, location: impl Into<String>) -> Self {
        self.with_parent(Parent::Location(EntityId::new(location)))
    }

    /// Place the entity inside or on another item.
    pub fn in_item(self, item: impl Into<String>) -> Self {
        self.with_parent(Parent::Item(EntityId::new(item)))
    }

    /// Set a custom property.
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Whether the entity carries the flag.
    pub fn has(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }

    /// Whether a word names this entity (case-insensitive).
    pub fn answers_to(&self, word: &str) -> bool {
        self.name.eq_ignore_ascii_case(word)
            || self.synonyms.iter().any(|s| s.eq_ignore_ascii_case(word))
    }
}
