use crate::change::Attribute;
use crate::entity::EntityId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when building or mutating a world.
///
/// Everything here is a content or programming error. Player-facing refusals
/// never travel through this type.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested entity ID does not exist in the world.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// An entity with the same ID was already added.
    #[error("entity already exists: {0}")]
    DuplicateEntity(EntityId),

    /// A change carried a value of the wrong type for its attribute.
    #[error("type mismatch on {entity}.{attribute}: expected {expected}, found {found}")]
    TypeMismatch {
        /// The entity being changed.
        entity: EntityId,
        /// The attribute being changed.
        attribute: Attribute,
        /// The accepted type.
        expected: &'static str,
        /// The type that was supplied.
        found: String,
    },

    /// A parent reference points at an entity of the wrong kind or a missing one.
    #[error("invalid parent for {entity}: {reason}")]
    InvalidParent {
        /// The entity being placed.
        entity: EntityId,
        /// What is wrong with the placement.
        reason: String,
    },

    /// The world has no player entity.
    #[error("world has no player entity")]
    MissingPlayer,

    /// The world could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
