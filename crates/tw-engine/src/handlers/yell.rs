use crate::action::{ActionContext, ActionHandler, ActionResult, Processed};
use crate::effect::SideEffect;
use crate::error::EngineResult;

/// Shouting. Raises a "noise" event in the current location.
#[derive(Debug, Clone, Copy, Default)]
pub struct Yell;

/// Name of the event raised by yelling.
pub const NOISE: &str = "noise";

impl ActionHandler for Yell {
    fn name(&self) -> &str {
        "yell"
    }

    fn synonyms(&self) -> &'static [&'static str] {
        &["yell", "shout", "scream", "shriek", "holler"]
    }

    fn syntax(&self) -> &'static [&'static str] {
        &["VERB"]
    }

    fn requires_light(&self) -> bool {
        false
    }

    fn process(&self, ctx: &mut ActionContext<'_>) -> EngineResult<Processed> {
        let text = ctx.vary(&[
            "Aaaarrrrgggghhhh!",
            "You shout at the top of your lungs. Nobody answers.",
            "Your voice echoes, then fades.",
        ]);
        let mut result = ActionResult::message(text);
        if let Some(here) = ctx.player_location() {
            result = result.with_effect(SideEffect::event(NOISE, vec![here.clone()]));
        }
        Ok(Processed::Done(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::handlers::testing::{kitchen, run};
    use tw_core::EntityId;

    #[test]
    fn yelling_makes_noise_here() {
        let out = run(&Yell, &kitchen(), &Command::new("holler")).unwrap();
        let Processed::Done(result) = out else {
            panic!("yell should finish");
        };
        assert!(result.changes.is_empty());
        assert_eq!(
            result.effects,
            vec![SideEffect::event(NOISE, vec![EntityId::from("kitchen")])]
        );
    }
}
