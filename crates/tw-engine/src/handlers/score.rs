use crate::action::{ActionContext, ActionHandler, Processed};
use crate::error::EngineResult;

use super::say;

/// Reporting score and moves. Takes no time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Score;

impl ActionHandler for Score {
    fn name(&self) -> &str {
        "score"
    }

    fn synonyms(&self) -> &'static [&'static str] {
        &["score"]
    }

    fn syntax(&self) -> &'static [&'static str] {
        &["VERB"]
    }

    fn requires_light(&self) -> bool {
        false
    }

    fn consumes_turn(&self) -> bool {
        false
    }

    fn process(&self, ctx: &mut ActionContext<'_>) -> EngineResult<Processed> {
        let moves = ctx.world.moves();
        let unit = if moves == 1 { "move" } else { "moves" };
        Ok(say(format!(
            "Your score is {}, in {moves} {unit}.",
            ctx.world.score()
        )))
    }
}
