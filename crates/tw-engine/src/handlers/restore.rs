use tracing::{info, warn};

use crate::action::{ActionContext, ActionHandler, ActionResult, Processed};
use crate::confirm::Confirmation;
use crate::error::EngineResult;

use super::say;

/// Reinstating the last snapshot after a yes/no question. Takes no time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Restore;

impl ActionHandler for Restore {
    fn name(&self) -> &str {
        "restore"
    }

    fn synonyms(&self) -> &'static [&'static str] {
        &["restore", "load"]
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
        if ctx.persistence().latest().is_none() {
            return Ok(say("There is no saved game to restore."));
        }
        Ok(Processed::Confirm {
            prompt: "Restoring will lose any progress since your last save. Are you sure? (y/n)"
                .to_string(),
        })
    }

    fn resume(
        &self,
        ctx: &mut ActionContext<'_>,
        answer: Confirmation,
    ) -> EngineResult<ActionResult> {
        if answer == Confirmation::No {
            return Ok(ActionResult::message("Restore cancelled."));
        }
        let store = ctx.persistence();
        let Some(snapshot) = store.latest() else {
            return Ok(ActionResult::message("There is no saved game to restore."));
        };
        match store.restore(snapshot) {
            Ok(world) => {
                info!(snapshot = %snapshot.id, moves = snapshot.moves, "snapshot_restored");
                Ok(ActionResult::message("Game restored.").with_replacement(world))
            }
            Err(err) => {
                warn!(snapshot = %snapshot.id, error = %err, "restore_failed");
                Ok(ActionResult::message("The saved game could not be restored."))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::config::EngineConfig;
    use crate::handlers::testing::kitchen;
    use crate::persistence::{JsonPersistence, Persistence};
    use crate::scope::StandardScope;

    #[test]
    fn nothing_to_restore() {
        let world = kitchen();
        let cmd = Command::new("restore");
        let config = EngineConfig::default();
        let mut store = JsonPersistence::new();
        let mut ctx = ActionContext::new(&cmd, &world, &StandardScope, &config, &mut store);
        let out = Restore.process(&mut ctx).unwrap();
        assert!(matches!(out, Processed::Done(_)));
    }

    #[test]
    fn asks_then_replaces_on_yes() {
        let world = kitchen();
        let cmd = Command::new("load");
        let config = EngineConfig::default();
        let mut store = JsonPersistence::new();
        store.capture(&world).unwrap();
        let mut ctx = ActionContext::new(&cmd, &world, &StandardScope, &config, &mut store);

        assert!(matches!(
            Restore.process(&mut ctx).unwrap(),
            Processed::Confirm { .. }
        ));
        let yes = Restore.resume(&mut ctx, Confirmation::Yes).unwrap();
        assert_eq!(yes.replacement.as_deref(), Some(&world));

        let no = Restore.resume(&mut ctx, Confirmation::No).unwrap();
        assert!(no.replacement.is_none());
        assert!(no.changes.is_empty());
        assert_eq!(no.message.as_deref(), Some("Restore cancelled."));
    }
}
