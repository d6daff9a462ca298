//! Error types for the execution engine.

use thiserror::Error;
use tw_core::CoreError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that escape the engine.
///
/// Player-facing refusals are not errors; see [`crate::action::Denial`].
/// What remains is configuration mistakes caught at construction, internal
/// failures while applying a result, and misuse of the confirmation protocol.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Two handlers claimed the same verb.
    #[error("verb \"{verb}\" is claimed by both {first} and {second}")]
    SynonymCollision {
        /// The contested verb.
        verb: String,
        /// The handler that registered it first.
        first: String,
        /// The handler that tried to register it again.
        second: String,
    },

    /// A handler registered without any verbs.
    #[error("handler {0} declares no synonyms")]
    NoSynonyms(String),

    /// A handler registered without any syntax rules.
    #[error("handler {0} declares no syntax rules")]
    EmptySyntax(String),

    /// A syntax rule could not be understood.
    #[error("malformed syntax rule for {handler}: {reason}")]
    MalformedSyntax {
        /// The handler declaring the rule.
        handler: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Applying a result to the world failed.
    #[error("failed to apply action result: {0}")]
    Apply(#[from] CoreError),

    /// A side-effect runner failed.
    #[error("side effect runner {runner} failed: {reason}")]
    EffectFailed {
        /// The runner that failed.
        runner: String,
        /// What went wrong.
        reason: String,
    },

    /// A new command arrived while a confirmation is outstanding.
    #[error("a confirmation is pending; answer it before issuing new commands")]
    ConfirmationPending,

    /// An answer arrived with no confirmation outstanding.
    #[error("no confirmation is pending")]
    NoPendingConfirmation,
}

/// Errors raised by a [`crate::persistence::Persistence`] collaborator.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Nothing has been captured yet.
    #[error("no snapshot has been captured")]
    NoSnapshot,

    /// The world could not be encoded or decoded.
    #[error("snapshot codec error: {0}")]
    Codec(#[from] CoreError),

    /// The storage backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors from turning raw text into a [`crate::command::Command`].
///
/// The display text is what the player sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input held no words.
    #[error("I beg your pardon?")]
    Empty,

    /// A noun phrase did not name anything in the world.
    #[error("You can't see any such thing.")]
    UnknownNoun(String),
}
