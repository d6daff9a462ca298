use tw_core::{Parent, StateChange};

use crate::action::{ActionContext, ActionHandler, ActionResult, Denial, Processed};
use crate::error::EngineResult;

use super::{ask_what, say};

/// Putting carried items down. Works in the dark.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropItem;

impl ActionHandler for DropItem {
    fn name(&self) -> &str {
        "drop"
    }

    fn synonyms(&self) -> &'static [&'static str] {
        &["drop", "discard"]
    }

    fn syntax(&self) -> &'static [&'static str] {
        &["VERB DIRECT"]
    }

    fn requires_light(&self) -> bool {
        false
    }

    fn out_of_reach(&self, name: &str) -> String {
        format!("You don't have the {name}.")
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> Result<(), Denial> {
        match ctx.direct() {
            Some(target) if target.parent != Parent::Player => Err(Denial::invalid_target(
                format!("You aren't carrying the {}.", target.name),
            )),
            _ => Ok(()),
        }
    }

    fn process(&self, ctx: &mut ActionContext<'_>) -> EngineResult<Processed> {
        let Some(target) = ctx.direct() else {
            return Ok(ask_what(ctx));
        };
        let Some(here) = ctx.player_location() else {
            return Ok(say("There is nowhere to put it."));
        };
        Ok(Processed::Done(
            ActionResult::message("Dropped.")
                .with_change(StateChange::move_to(&target.id, Parent::Location(here.clone()))),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::handlers::testing::{kitchen, run};

    #[test]
    fn drops_carried_item_here() {
        let mut world = kitchen();
        world
            .apply(vec![StateChange::move_to("knife", Parent::Player)])
            .unwrap();
        let out = run(&DropItem, &world, &Command::new("drop").with_direct("knife")).unwrap();
        let Processed::Done(result) = out else {
            panic!("drop should finish");
        };
        assert_eq!(
            result.changes,
            vec![StateChange::move_to("knife", Parent::Location("kitchen".into()))]
        );
    }

    #[test]
    fn must_be_carrying() {
        let denial =
            run(&DropItem, &kitchen(), &Command::new("discard").with_direct("spoon")).unwrap_err();
        assert_eq!(denial.message, "You aren't carrying the spoon.");
    }
}
