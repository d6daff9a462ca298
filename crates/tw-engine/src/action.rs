//! The handler contract: validation, processing and the result record.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tw_core::{Entity, EntityId, StateChange, World};

use crate::command::Command;
use crate::config::EngineConfig;
use crate::confirm::Confirmation;
use crate::effect::SideEffect;
use crate::error::EngineResult;
use crate::persistence::Persistence;
use crate::scope::Scope;
use crate::syntax::SyntaxRule;

/// Why a command was refused before it could act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenialKind {
    /// No handler claims the verb.
    NoHandlerForVerb,
    /// The verb is known but no syntax rule fits.
    NoMatchingSyntax,
    /// The handler needs light and there is none.
    AreaDark,
    /// A required object slot is empty.
    TargetMissing,
    /// An object exists but cannot be reached.
    TargetNotInScope,
    /// The handler rejects the object for what it is.
    SemanticallyInvalidTarget,
}

impl fmt::Display for DenialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoHandlerForVerb => "no_handler_for_verb",
            Self::NoMatchingSyntax => "no_matching_syntax",
            Self::AreaDark => "area_dark",
            Self::TargetMissing => "target_missing",
            Self::TargetNotInScope => "target_not_in_scope",
            Self::SemanticallyInvalidTarget => "semantically_invalid_target",
        };
        write!(f, "{name}")
    }
}

/// A refusal with the text to show the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    /// The failure category.
    pub kind: DenialKind,
    /// Rendered message.
    pub message: String,
}

impl Denial {
    /// Create a denial.
    pub fn new(kind: DenialKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// A handler-level rejection of the object.
    pub fn invalid_target(message: impl Into<String>) -> Self {
        Self::new(DenialKind::SemanticallyInvalidTarget, message)
    }
}

/// Everything an action wants to happen.
///
/// Changes are applied in order, then side effects run in order, then the
/// message is rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionResult {
    /// Text to show the player.
    pub message: Option<String>,
    /// World mutations, in application order.
    pub changes: Vec<StateChange>,
    /// Consequences run after the changes.
    pub effects: Vec<SideEffect>,
    /// A whole world to install in place of the current one.
    pub replacement: Option<Box<World>>,
}

impl ActionResult {
    /// A result that only shows text.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            message: Some(text.into()),
            ..Self::default()
        }
    }

    /// Append a change.
    pub fn with_change(mut self, change: StateChange) -> Self {
        self.changes.push(change);
        self
    }

    /// Append a side effect.
    pub fn with_effect(mut self, effect: SideEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Replace the world wholesale.
    pub fn with_replacement(mut self, world: World) -> Self {
        self.replacement = Some(Box::new(world));
        self
    }
}

/// What a handler's process step produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Processed {
    /// The action finished.
    Done(ActionResult),
    /// The action needs a yes/no answer before it can finish.
    Confirm {
        /// Question shown to the player.
        prompt: String,
    },
}

/// Read-only view of the game handed to a handler.
///
/// The world is borrowed immutably for the whole validate and process
/// phase; handlers describe changes and never write the world themselves.
pub struct ActionContext<'a> {
    /// The command being executed.
    pub command: &'a Command,
    /// The world as it was before this command.
    pub world: &'a World,
    scope: &'a dyn Scope,
    config: &'a EngineConfig,
    persistence: &'a mut dyn Persistence,
}

impl<'a> ActionContext<'a> {
    /// Assemble a context.
    pub fn new(
        command: &'a Command,
        world: &'a World,
        scope: &'a dyn Scope,
        config: &'a EngineConfig,
        persistence: &'a mut dyn Persistence,
    ) -> Self {
        Self {
            command,
            world,
            scope,
            config,
            persistence,
        }
    }

    /// The direct object entity.
    pub fn direct(&self) -> Option<&'a Entity> {
        self.command.direct().and_then(|id| self.world.get_entity(id))
    }

    /// The indirect object entity.
    pub fn indirect(&self) -> Option<&'a Entity> {
        self.command.indirect().and_then(|id| self.world.get_entity(id))
    }

    /// The player's id.
    pub fn player_id(&self) -> &'a EntityId {
        self.world.player_id()
    }

    /// The location the player is in.
    pub fn player_location(&self) -> Option<&'a EntityId> {
        self.world.player_location()
    }

    /// Whether an entity is reachable from the player's location.
    pub fn is_reachable(&self, id: &EntityId) -> bool {
        self.player_location()
            .is_some_and(|from| self.scope.is_reachable(self.world, id, from))
    }

    /// The snapshot store.
    pub fn persistence(&self) -> &dyn Persistence {
        &*self.persistence
    }

    /// The snapshot store, for capturing.
    pub fn persistence_mut(&mut self) -> &mut dyn Persistence {
        &mut *self.persistence
    }

    /// Pick one of several phrasings.
    ///
    /// The choice depends only on the configured seed and the move counter,
    /// so replaying the same state renders the same text.
    pub fn vary<'s>(&self, options: &[&'s str]) -> &'s str {
        if options.is_empty() {
            return "";
        }
        let mut rng = StdRng::seed_from_u64(self.config.seed ^ self.world.moves());
        options[rng.random_range(0..options.len())]
    }
}

/// One family of verbs.
///
/// The engine calls [`validate`](ActionHandler::validate) after its own
/// light, presence and scope checks, then
/// [`process`](ActionHandler::process). Neither step may touch the world.
pub trait ActionHandler: std::fmt::Debug {
    /// Human-readable name, used in logs and registration errors.
    fn name(&self) -> &str;

    /// Verbs this handler answers to. The first is canonical.
    fn synonyms(&self) -> &'static [&'static str];

    /// Accepted sentence shapes, most specific first.
    fn syntax(&self) -> &'static [&'static str];

    /// Whether the handler refuses to act in the dark.
    fn requires_light(&self) -> bool {
        true
    }

    /// Whether a completed action advances the move counter.
    fn consumes_turn(&self) -> bool {
        true
    }

    /// Whether a successful action marks its direct object touched.
    fn marks_touched(&self) -> bool {
        true
    }

    /// Text for an object the player cannot reach.
    fn out_of_reach(&self, name: &str) -> String {
        format!("You can't reach the {name} from here.")
    }

    /// Handler-specific checks on the resolved objects.
    fn validate(&self, _ctx: &ActionContext<'_>) -> Result<(), Denial> {
        Ok(())
    }

    /// Decide what the action does.
    fn process(&self, ctx: &mut ActionContext<'_>) -> EngineResult<Processed>;

    /// Finish an action suspended by [`Processed::Confirm`].
    fn resume(
        &self,
        _ctx: &mut ActionContext<'_>,
        _answer: Confirmation,
    ) -> EngineResult<ActionResult> {
        Ok(ActionResult::default())
    }
}

/// Compile a handler's declared patterns.
pub(crate) fn compile_syntax(handler: &dyn ActionHandler) -> Result<Vec<SyntaxRule>, String> {
    handler
        .syntax()
        .iter()
        .map(|pattern| SyntaxRule::parse(pattern).map_err(|e| format!("\"{pattern}\": {e}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::JsonPersistence;
    use crate::scope::StandardScope;
    use tw_core::{Flag, WorldMeta};

    fn world() -> World {
        let mut world =
            World::new(WorldMeta::new("Ctx"), Entity::player("me").in_location("cave")).unwrap();
        world
            .add_entity(Entity::location("cave", "Cave").with_flag(Flag::Lit))
            .unwrap();
        world.add_entity(Entity::item("rock", "rock").in_location("cave")).unwrap();
        world
    }

    #[test]
    fn context_resolves_objects() {
        let w = world();
        let cmd = Command::new("kick").with_direct("rock");
        let config = EngineConfig::default();
        let mut store = JsonPersistence::new();
        let ctx = ActionContext::new(&cmd, &w, &StandardScope, &config, &mut store);

        assert_eq!(ctx.direct().map(|e| e.name.as_str()), Some("rock"));
        assert!(ctx.indirect().is_none());
        assert_eq!(ctx.player_location(), Some(&EntityId::from("cave")));
        assert!(ctx.is_reachable(&EntityId::from("rock")));
        assert!(ctx.persistence().latest().is_none());
    }

    #[test]
    fn vary_is_deterministic() {
        let w = world();
        let cmd = Command::new("yell");
        let config = EngineConfig::default();
        let mut store = JsonPersistence::new();
        let ctx = ActionContext::new(&cmd, &w, &StandardScope, &config, &mut store);

        let options = ["a", "b", "c", "d"];
        let first = ctx.vary(&options);
        for _ in 0..10 {
            assert_eq!(ctx.vary(&options), first);
        }
        assert_eq!(ctx.vary(&[]), "");
    }

    #[test]
    fn result_builders_keep_order() {
        let result = ActionResult::message("Done.")
            .with_change(StateChange::touch("rock"))
            .with_change(StateChange::touch("table"))
            .with_effect(SideEffect::StopFuse { name: "lamp".into() });
        assert_eq!(result.message.as_deref(), Some("Done."));
        assert_eq!(result.changes[1].entity, EntityId::from("table"));
        assert_eq!(result.effects.len(), 1);
        assert!(result.replacement.is_none());
    }
}
