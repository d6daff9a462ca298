//! Built-in verb handlers.

mod climb;
mod cut;
mod drop;
mod kick;
mod laugh;
mod restore;
mod save;
mod score;
mod take;
mod wait;
mod yell;

pub use climb::Climb;
pub use cut::Cut;
pub use drop::DropItem;
pub use kick::Kick;
pub use laugh::Laugh;
pub use restore::Restore;
pub use save::Save;
pub use score::Score;
pub use take::{POINTS, SCORED, Take};
pub use wait::Wait;
pub use yell::{NOISE, Yell};

use crate::action::{ActionContext, ActionHandler, ActionResult, Processed};
use crate::messages;

/// Every built-in handler, in registration order.
pub fn standard_handlers() -> Vec<Box<dyn ActionHandler>> {
    vec![
        Box::new(Kick),
        Box::new(Climb),
        Box::new(Cut),
        Box::new(Take),
        Box::new(DropItem),
        Box::new(Yell),
        Box::new(Laugh),
        Box::new(Wait),
        Box::new(Score),
        Box::new(Save),
        Box::new(Restore),
    ]
}

/// A finished action that only prints text.
pub(crate) fn say(text: impl Into<String>) -> Processed {
    Processed::Done(ActionResult::message(text))
}

/// Fallback when a handler runs without its direct object.
pub(crate) fn ask_what(ctx: &ActionContext<'_>) -> Processed {
    say(messages::what(&ctx.command.display_verb()))
}
