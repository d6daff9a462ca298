use crate::action::{ActionContext, ActionHandler, Processed};
use crate::error::EngineResult;

use super::say;

/// Laughing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Laugh;

impl ActionHandler for Laugh {
    fn name(&self) -> &str {
        "laugh"
    }

    fn synonyms(&self) -> &'static [&'static str] {
        &["laugh", "chuckle", "giggle", "snicker", "chortle"]
    }

    fn syntax(&self) -> &'static [&'static str] {
        &["VERB"]
    }

    fn requires_light(&self) -> bool {
        false
    }

    fn process(&self, ctx: &mut ActionContext<'_>) -> EngineResult<Processed> {
        Ok(say(ctx.vary(&[
            "You laugh heartily.",
            "You chuckle quietly to yourself.",
            "A giggle escapes you before you can stop it.",
            "You laugh, though nothing is particularly funny.",
        ])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::handlers::testing::{kitchen, message, run};

    #[test]
    fn synonyms_laugh_alike() {
        let world = kitchen();
        let laugh = run(&Laugh, &world, &Command::new("laugh")).unwrap();
        let giggle = run(&Laugh, &world, &Command::new("giggle")).unwrap();
        assert_eq!(laugh, giggle);
        assert!(!message(&laugh).is_empty());
    }
}
