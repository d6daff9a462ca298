use tracing::warn;

use crate::action::{ActionContext, ActionHandler, Processed};
use crate::error::EngineResult;

use super::say;

/// Capturing a snapshot. Takes no time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Save;

impl ActionHandler for Save {
    fn name(&self) -> &str {
        "save"
    }

    fn synonyms(&self) -> &'static [&'static str] {
        &["save"]
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
        let world = ctx.world;
        match ctx.persistence_mut().capture(world) {
            Ok(_) => Ok(say("Game saved.")),
            Err(err) => {
                warn!(error = %err, "save_failed");
                Ok(say("The game could not be saved."))
            }
        }
    }
}
