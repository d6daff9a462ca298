//! The execution pipeline: dispatch, validate, process, apply, render.

use tracing::{debug, error, info, warn};
use tw_core::{StateChange, World};

use crate::action::{ActionContext, ActionResult, Denial, DenialKind, Processed};
use crate::command::Command;
use crate::config::EngineConfig;
use crate::confirm::Reply;
use crate::dispatch::{Dispatcher, Route};
use crate::effect::{EffectLog, EffectRecord, EffectRunner};
use crate::error::{EngineError, EngineResult, ParseError};
use crate::io::Io;
use crate::messages;
use crate::parser;
use crate::persistence::{JsonPersistence, Persistence};
use crate::scope::{Scope, StandardScope};
use crate::syntax::Slot;

/// A command suspended on a yes/no question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    /// The command that asked.
    pub command: Command,
    /// The prompt shown.
    pub prompt: String,
    handler: usize,
}

/// Whether the engine accepts new commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EngineState {
    /// Ready for the next command.
    #[default]
    Ready,
    /// Waiting for the answer to a confirmation prompt.
    AwaitingConfirmation(PendingConfirmation),
}

/// How a command ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The handler ran and its result was applied.
    Completed(ActionResult),
    /// The command was refused before the handler acted.
    Denied(Denial),
    /// The command is waiting for a yes/no answer.
    Suspended {
        /// The question asked.
        prompt: String,
    },
    /// The input could not be turned into a command.
    Unparsed(ParseError),
}

impl Outcome {
    /// The denial kind, if the command was denied.
    pub fn denial_kind(&self) -> Option<DenialKind> {
        match self {
            Self::Denied(denial) => Some(denial.kind),
            _ => None,
        }
    }

    /// The applied result, if the command completed.
    pub fn result(&self) -> Option<&ActionResult> {
        match self {
            Self::Completed(result) => Some(result),
            _ => None,
        }
    }
}

/// Owns the world and runs commands against it one at a time.
pub struct Engine<I: Io> {
    world: World,
    dispatcher: Dispatcher,
    scope: Box<dyn Scope>,
    persistence: Box<dyn Persistence>,
    io: I,
    config: EngineConfig,
    state: EngineState,
    effects: EffectLog,
    runners: Vec<Box<dyn EffectRunner>>,
}

impl<I: Io> Engine<I> {
    /// An engine with the built-in handlers and default configuration.
    pub fn new(world: World, io: I) -> EngineResult<Self> {
        Self::with_config(world, io, EngineConfig::default())
    }

    /// An engine with the built-in handlers.
    pub fn with_config(world: World, io: I, config: EngineConfig) -> EngineResult<Self> {
        Self::from_parts(
            world,
            Dispatcher::standard()?,
            Box::new(JsonPersistence::new()),
            io,
            config,
        )
    }

    /// An engine from explicit collaborators.
    pub fn from_parts(
        world: World,
        dispatcher: Dispatcher,
        persistence: Box<dyn Persistence>,
        io: I,
        config: EngineConfig,
    ) -> EngineResult<Self> {
        world.validate()?;
        info!(
            world = %world.meta.name,
            entities = world.entity_count(),
            handlers = dispatcher.len(),
            "engine_started"
        );
        Ok(Self {
            world,
            dispatcher,
            scope: Box::new(StandardScope),
            persistence,
            io,
            effects: EffectLog::new(config.max_effect_log),
            config,
            state: EngineState::Ready,
            runners: Vec::new(),
        })
    }

    /// Replace the scope rules.
    pub fn with_scope(mut self, scope: impl Scope + 'static) -> Self {
        self.scope = Box::new(scope);
        self
    }

    /// Register a side-effect runner. Runners run in registration order.
    pub fn add_effect_runner(&mut self, runner: Box<dyn EffectRunner>) {
        debug!(runner = runner.name(), "effect_runner_registered");
        self.runners.push(runner);
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The current world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The I/O boundary.
    pub fn io(&self) -> &I {
        &self.io
    }

    /// The I/O boundary, mutably.
    pub fn io_mut(&mut self) -> &mut I {
        &mut self.io
    }

    /// The snapshot store.
    pub fn persistence(&self) -> &dyn Persistence {
        self.persistence.as_ref()
    }

    /// The verb table.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Side effects run so far.
    pub fn effects(&self) -> &EffectLog {
        &self.effects
    }

    /// The confirmation state.
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Whether a yes/no answer is outstanding.
    pub fn is_awaiting_confirmation(&self) -> bool {
        matches!(self.state, EngineState::AwaitingConfirmation(_))
    }

    // -----------------------------------------------------------------------
    // Pipeline
    // -----------------------------------------------------------------------

    /// Handle one line of player input.
    ///
    /// While a confirmation is outstanding the line is taken as its answer.
    pub fn submit(&mut self, input: &str) -> EngineResult<Outcome> {
        if self.is_awaiting_confirmation() {
            return self.answer(input);
        }
        match parser::parse_command(&self.world, input) {
            Ok(command) => self.execute(command),
            Err(err) => {
                info!(input, error = %err, "input_unparsed");
                self.io.render(&err.to_string());
                Ok(Outcome::Unparsed(err))
            }
        }
    }

    /// Run a resolved command through the whole pipeline.
    pub fn execute(&mut self, command: Command) -> EngineResult<Outcome> {
        if self.is_awaiting_confirmation() {
            return Err(EngineError::ConfirmationPending);
        }
        info!(
            verb = command.verb(),
            raw = command.raw(),
            moves = self.world.moves(),
            "command_received"
        );

        let route = match self.dispatcher.route(&command) {
            Ok(route) => route,
            Err(denial) => return Ok(self.deny(denial, None)),
        };
        if let Err(denial) = self.precheck(route, &command) {
            return Ok(self.deny(denial, Some(route.handler)));
        }

        let Some(handler) = self.dispatcher.handler(route.handler) else {
            let denial = Denial::new(
                DenialKind::NoHandlerForVerb,
                messages::unknown_verb(command.verb()),
            );
            return Ok(self.deny(denial, None));
        };
        let mut ctx = ActionContext::new(
            &command,
            &self.world,
            self.scope.as_ref(),
            &self.config,
            self.persistence.as_mut(),
        );
        if let Err(denial) = handler.validate(&ctx) {
            return Ok(self.deny(denial, Some(route.handler)));
        }

        let processed = match handler.process(&mut ctx) {
            Ok(processed) => processed,
            Err(err) => {
                error!(handler = handler.name(), error = %err, "process_failed");
                return Err(err);
            }
        };
        match processed {
            Processed::Done(result) => self.complete(route.handler, &command, result),
            Processed::Confirm { prompt } => self.suspend(route.handler, command, prompt),
        }
    }

    /// Answer an outstanding confirmation.
    ///
    /// Anything other than yes or no is reported and taken as no. Answering
    /// when nothing is pending fails without touching the world.
    pub fn answer(&mut self, line: &str) -> EngineResult<Outcome> {
        let EngineState::AwaitingConfirmation(pending) =
            std::mem::take(&mut self.state)
        else {
            return Err(EngineError::NoPendingConfirmation);
        };

        let reply = Reply::parse(line);
        info!(reply = ?reply, verb = pending.command.verb(), "confirmation_answered");
        if reply == Reply::Unrecognized {
            self.io.render(messages::DISAMBIGUATION);
        }

        let Some(handler) = self.dispatcher.handler(pending.handler) else {
            return Err(EngineError::NoPendingConfirmation);
        };
        let mut ctx = ActionContext::new(
            &pending.command,
            &self.world,
            self.scope.as_ref(),
            &self.config,
            self.persistence.as_mut(),
        );
        let result = handler.resume(&mut ctx, reply.into())?;
        self.complete(pending.handler, &pending.command, result)
    }

    /// Light, presence and scope checks, in that order.
    fn precheck(&self, route: Route, command: &Command) -> Result<(), Denial> {
        let (Some(handler), Some(rule)) = (
            self.dispatcher.handler(route.handler),
            self.dispatcher.rule(route),
        ) else {
            return Err(Denial::new(
                DenialKind::NoHandlerForVerb,
                messages::unknown_verb(command.verb()),
            ));
        };
        let here = self.world.player_location();

        if handler.requires_light() && !here.is_some_and(|l| self.scope.is_lit(&self.world, l)) {
            return Err(Denial::new(DenialKind::AreaDark, messages::DARKNESS));
        }

        match rule.missing_slot(command) {
            Some(Slot::Direct) => {
                return Err(Denial::new(
                    DenialKind::TargetMissing,
                    messages::what(&command.display_verb()),
                ));
            }
            Some(Slot::Indirect) => {
                let direct = command
                    .direct()
                    .map(|id| self.display_name(id))
                    .unwrap_or_default();
                return Err(Denial::new(
                    DenialKind::TargetMissing,
                    messages::with_what(&command.display_verb(), &direct),
                ));
            }
            None => {}
        }

        for id in [command.direct(), command.indirect()].into_iter().flatten() {
            let reachable = self.world.contains(id)
                && here.is_some_and(|from| self.scope.is_reachable(&self.world, id, from));
            if !reachable {
                return Err(Denial::new(
                    DenialKind::TargetNotInScope,
                    handler.out_of_reach(&self.display_name(id)),
                ));
            }
        }
        Ok(())
    }

    fn display_name(&self, id: &tw_core::EntityId) -> String {
        self.world
            .get_entity(id)
            .map_or_else(|| id.to_string(), |e| e.name.clone())
    }

    /// Render a denial and settle the move counter.
    fn deny(&mut self, denial: Denial, handler: Option<usize>) -> Outcome {
        let exempt = handler
            .and_then(|i| self.dispatcher.handler(i))
            .is_some_and(|h| !h.consumes_turn());
        let consumes = !exempt && self.config.turn_policy.consumes(denial.kind);
        info!(kind = %denial.kind, consumes, "command_denied");

        self.io.render(&denial.message);
        if consumes {
            self.world.advance_moves();
        }
        Outcome::Denied(denial)
    }

    /// Show the prompt and wait for an answer.
    fn suspend(
        &mut self,
        handler: usize,
        command: Command,
        prompt: String,
    ) -> EngineResult<Outcome> {
        info!(verb = command.verb(), "confirmation_requested");
        self.io.render(&prompt);
        self.state = EngineState::AwaitingConfirmation(PendingConfirmation {
            command,
            prompt: prompt.clone(),
            handler,
        });
        match self.io.request_line() {
            Some(line) => self.answer(&line),
            None => Ok(Outcome::Suspended { prompt }),
        }
    }

    /// Apply a result: replacement, changes, side effects, message, moves.
    fn complete(
        &mut self,
        handler: usize,
        command: &Command,
        mut result: ActionResult,
    ) -> EngineResult<Outcome> {
        let (name, touches, consumes) = match self.dispatcher.handler(handler) {
            Some(h) => (h.name().to_string(), h.marks_touched(), h.consumes_turn()),
            None => (String::new(), false, true),
        };

        if touches {
            let target = command
                .direct()
                .and_then(|id| self.world.get_entity(id))
                .filter(|e| e.kind.is_physical());
            if let Some(target) = target {
                result.changes.insert(0, StateChange::touch(&target.id));
            }
        }

        let at = self.config.clock.now();
        let applied = match &result.replacement {
            Some(replacement) => {
                let mut staged = self.world.clone();
                staged.replace_state(replacement.as_ref().clone());
                let count = staged
                    .apply_at(result.changes.clone(), at)
                    .map(|records| records.len());
                count.map(|count| (count, Some(staged)))
            }
            None => self
                .world
                .apply_at(result.changes.clone(), at)
                .map(|records| (records.len(), None)),
        };
        match applied {
            Ok((count, staged)) => {
                if let Some(staged) = staged {
                    self.world = staged;
                    info!(handler = %name, moves = self.world.moves(), "world_replaced");
                }
                debug!(handler = %name, applied = count, "changes_applied");
            }
            Err(err) => {
                error!(handler = %name, error = %err, "apply_failed");
                return Err(err.into());
            }
        }

        let turn = self.world.moves();
        let mut follow_up = Vec::new();
        for effect in &result.effects {
            self.effects.push(EffectRecord {
                turn,
                effect: effect.clone(),
            });
            for runner in &mut self.runners {
                match runner.run(effect, &self.world) {
                    Ok(Some(text)) => follow_up.push(text),
                    Ok(None) => {}
                    Err(err) => {
                        warn!(
                            runner = runner.name(),
                            effect = effect.name(),
                            error = %err,
                            "effect_failed"
                        );
                        return Err(err);
                    }
                }
            }
        }

        if let Some(message) = &result.message {
            self.io.render(message);
        }
        for text in &follow_up {
            self.io.render(text);
        }

        if consumes {
            self.world.advance_moves();
        }
        info!(
            handler = %name,
            changes = result.changes.len(),
            effects = result.effects.len(),
            moves = self.world.moves(),
            "action_completed"
        );
        Ok(Outcome::Completed(result))
    }
}
