use crate::action::{ActionContext, ActionHandler, Processed};
use crate::error::EngineResult;

use super::{ask_what, say};

/// Climbing. Nothing in the base game can be climbed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Climb;

impl ActionHandler for Climb {
    fn name(&self) -> &str {
        "climb"
    }

    fn synonyms(&self) -> &'static [&'static str] {
        &["climb", "scale", "ascend"]
    }

    fn syntax(&self) -> &'static [&'static str] {
        &["VERB ON DIRECT", "VERB DIRECT"]
    }

    fn out_of_reach(&self, name: &str) -> String {
        format!("The {name} remains frustratingly inaccessible.")
    }

    fn process(&self, ctx: &mut ActionContext<'_>) -> EngineResult<Processed> {
        let Some(target) = ctx.direct() else {
            return Ok(ask_what(ctx));
        };
        Ok(say(format!(
            "The universe denies your request to climb the {}.",
            target.name
        )))
    }
}
