use tw_core::{EntityKind, Flag};

use crate::action::{ActionContext, ActionHandler, Processed};
use crate::error::EngineResult;

use super::{ask_what, say};

/// Kicking things. Characters get a warning instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct Kick;

impl ActionHandler for Kick {
    fn name(&self) -> &str {
        "kick"
    }

    fn synonyms(&self) -> &'static [&'static str] {
        &["kick", "punt"]
    }

    fn syntax(&self) -> &'static [&'static str] {
        &["VERB DIRECT"]
    }

    fn out_of_reach(&self, name: &str) -> String {
        format!("The {name} lurks beyond your reach.")
    }

    fn process(&self, ctx: &mut ActionContext<'_>) -> EngineResult<Processed> {
        let Some(target) = ctx.direct() else {
            return Ok(ask_what(ctx));
        };
        let text = if target.kind == EntityKind::Player {
            "You'd have to be a contortionist.".to_string()
        } else if target.has(Flag::Character) {
            format!("I don't think the {} would appreciate that.", target.name)
        } else {
            format!("Kicking the {} doesn't accomplish much, but you feel better.", target.name)
        };
        Ok(say(text))
    }
}
