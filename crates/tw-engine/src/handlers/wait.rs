use crate::action::{ActionContext, ActionHandler, Processed};
use crate::error::EngineResult;

use super::say;

/// Letting a turn pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wait;

impl ActionHandler for Wait {
    fn name(&self) -> &str {
        "wait"
    }

    fn synonyms(&self) -> &'static [&'static str] {
        &["wait", "z"]
    }

    fn syntax(&self) -> &'static [&'static str] {
        &["VERB"]
    }

    fn requires_light(&self) -> bool {
        false
    }

    fn process(&self, _ctx: &mut ActionContext<'_>) -> EngineResult<Processed> {
        Ok(say("Time passes."))
    }
}
