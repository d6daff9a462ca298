use tw_core::{EntityKind, Flag, Parent, StateChange, Value};

use crate::action::{ActionContext, ActionHandler, ActionResult, Denial, Processed};
use crate::error::EngineResult;

use super::ask_what;

/// Property holding the points an item is worth when first taken.
pub const POINTS: &str = "points";

/// Property recording that an item's points were awarded.
pub const SCORED: &str = "scored";

/// Picking items up.
#[derive(Debug, Clone, Copy, Default)]
pub struct Take;

impl ActionHandler for Take {
    fn name(&self) -> &str {
        "take"
    }

    fn synonyms(&self) -> &'static [&'static str] {
        &["take", "get", "grab"]
    }

    fn syntax(&self) -> &'static [&'static str] {
        &["VERB DIRECT"]
    }

    fn out_of_reach(&self, name: &str) -> String {
        format!("The {name} is out of your reach.")
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> Result<(), Denial> {
        let Some(target) = ctx.direct() else {
            return Ok(());
        };
        match target.kind {
            EntityKind::Player => Err(Denial::invalid_target("You are already yours.")),
            EntityKind::Location => Err(Denial::invalid_target("That's hardly portable.")),
            EntityKind::Item if target.parent == Parent::Player => Err(Denial::invalid_target(
                format!("You already have the {}.", target.name),
            )),
            EntityKind::Item if target.has(Flag::Character) => Err(Denial::invalid_target(
                format!("The {} would rather stay where they are.", target.name),
            )),
            EntityKind::Item if !target.has(Flag::Takable) => Err(Denial::invalid_target(
                format!("The {} won't budge.", target.name),
            )),
            EntityKind::Item => Ok(()),
        }
    }

    fn process(&self, ctx: &mut ActionContext<'_>) -> EngineResult<Processed> {
        let Some(target) = ctx.direct() else {
            return Ok(ask_what(ctx));
        };
        let mut result = ActionResult::message("Taken.")
            .with_change(StateChange::move_to(&target.id, Parent::Player));

        let points = target.properties.get(POINTS).and_then(Value::as_int);
        let scored = target
            .properties
            .get(SCORED)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if let Some(points) = points.filter(|_| !scored) {
            result = result
                .with_change(StateChange::score(ctx.player_id(), ctx.world.score() + points))
                .with_change(StateChange::property(&target.id, SCORED, Value::Bool(true)));
        }
        Ok(Processed::Done(result))
    }
}
