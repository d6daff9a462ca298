use tw_core::{EntityKind, Flag};

use crate::action::{ActionContext, ActionHandler, Denial, Processed};
use crate::error::EngineResult;

use super::{ask_what, say};

/// Cutting, optionally with a tool. Does not mark the target touched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cut;

impl ActionHandler for Cut {
    fn name(&self) -> &str {
        "cut"
    }

    fn synonyms(&self) -> &'static [&'static str] {
        &["cut", "slice", "chop"]
    }

    fn syntax(&self) -> &'static [&'static str] {
        &["VERB DIRECT WITH INDIRECT", "VERB DIRECT"]
    }

    fn marks_touched(&self) -> bool {
        false
    }

    fn out_of_reach(&self, name: &str) -> String {
        format!("You can't get close enough to the {name} to cut it.")
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> Result<(), Denial> {
        if ctx.direct().is_some_and(|e| e.kind == EntityKind::Player) {
            return Err(Denial::invalid_target(
                "Self-harm is not the answer, whatever the question.",
            ));
        }
        if let Some(tool) = ctx.indirect().filter(|tool| !tool.has(Flag::Sharp)) {
            return Err(Denial::invalid_target(format!(
                "The {} isn't sharp enough to cut anything.",
                tool.name
            )));
        }
        Ok(())
    }

    fn process(&self, ctx: &mut ActionContext<'_>) -> EngineResult<Processed> {
        let Some(target) = ctx.direct() else {
            return Ok(ask_what(ctx));
        };
        let text = match ctx.indirect() {
            Some(tool) => format!(
                "You saw at the {} with the {}, but nothing much comes of it.",
                target.name, tool.name
            ),
            None => format!("You'll need something sharp to cut the {}.", target.name),
        };
        Ok(say(text))
    }
}
