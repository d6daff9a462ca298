//! Execution core for Taleweaver: verb dispatch, validation, processing and
//! application of state changes.
//!
//! A [`Command`] flows through a fixed pipeline. The [`Dispatcher`] picks an
//! [`ActionHandler`] by verb and [`SyntaxRule`]; the [`Engine`] checks light,
//! object presence and reach before the handler's own checks; the handler
//! describes an [`ActionResult`]; the engine applies its changes in order,
//! runs side effects, renders the message and counts the move.

/// The handler contract and the result record.
pub mod action;
/// A resolved player command.
pub mod command;
/// Engine configuration and move accounting policy.
pub mod config;
/// Yes/no confirmation answers.
pub mod confirm;
/// Verb registration and routing.
pub mod dispatch;
/// Side effects and the effect log.
pub mod effect;
/// The execution pipeline.
pub mod engine;
/// Error types for the engine crate.
pub mod error;
/// Built-in verb handlers.
pub mod handlers;
/// Text input and output.
pub mod io;
/// Fixed player-facing text.
pub mod messages;
/// Input parsing and noun resolution.
pub mod parser;
/// World snapshots for save and restore.
pub mod persistence;
/// Reachability and lighting.
pub mod scope;
/// Syntax rules.
pub mod syntax;

/// Re-exports of the handler contract.
pub use action::{ActionContext, ActionHandler, ActionResult, Denial, DenialKind, Processed};
/// Re-export of [`command::Command`].
pub use command::Command;
/// Re-exports of configuration types.
pub use config::{Clock, EngineConfig, TurnPolicy};
/// Re-exports of confirmation types.
pub use confirm::{Confirmation, Reply};
/// Re-exports of dispatch types.
pub use dispatch::{Dispatcher, Route};
/// Re-exports of side-effect types.
pub use effect::{EffectLog, EffectRecord, EffectRunner, SideEffect};
/// Re-exports of engine types.
pub use engine::{Engine, EngineState, Outcome, PendingConfirmation};
/// Re-exports of error types.
pub use error::{EngineError, EngineResult, ParseError, PersistenceError};
/// Re-exports of I/O types.
pub use io::{Io, ScriptedIo, StdIo};
/// Re-export of [`parser::parse_command`].
pub use parser::parse_command;
/// Re-exports of persistence types.
pub use persistence::{JsonPersistence, Persistence, Snapshot};
/// Re-exports of scope types.
pub use scope::{Scope, StandardScope};
/// Re-exports of syntax types.
pub use syntax::{Slot, SyntaxRule, SyntaxToken};
