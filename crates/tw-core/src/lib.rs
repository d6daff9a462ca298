//! World model for Taleweaver: entities, flags, and the append-only change history.
//!
//! This crate owns the authoritative game state. It knows nothing about verbs
//! or handlers; the only way to mutate a [`World`] during play is
//! [`World::apply`], which records every [`StateChange`] in the world's
//! [`ChangeHistory`].

/// State changes, typed values, and the change history.
pub mod change;
/// Entity types, identifiers, flags and containment.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// The central world model that owns entities, counters and history.
pub mod world;

/// Re-export change types.
pub use change::{Attribute, ChangeHistory, ChangeRecord, StateChange, Value, ValueType};
/// Re-export core entity types.
pub use entity::{Entity, EntityId, EntityKind, Flag, Parent};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export world model types.
pub use world::{World, WorldMeta};
