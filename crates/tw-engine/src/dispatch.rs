//! Verb lookup and syntax selection.

use std::collections::HashMap;

use tracing::debug;

use crate::action::{compile_syntax, ActionHandler, Denial, DenialKind};
use crate::command::Command;
use crate::error::{EngineError, EngineResult};
use crate::messages;
use crate::syntax::SyntaxRule;

#[derive(Debug)]
struct Registered {
    handler: Box<dyn ActionHandler>,
    rules: Vec<SyntaxRule>,
}

/// The handler and rule chosen for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Index of the handler in registration order.
    pub handler: usize,
    /// Index of the matched rule within the handler's rules.
    pub rule: usize,
}

/// Maps verbs to handlers.
///
/// Each verb belongs to exactly one handler; registering a verb twice fails.
#[derive(Debug, Default)]
pub struct Dispatcher {
    handlers: Vec<Registered>,
    verbs: HashMap<String, usize>,
}

impl Dispatcher {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher with every built-in handler registered.
    pub fn standard() -> EngineResult<Self> {
        let mut dispatcher = Self::new();
        for handler in crate::handlers::standard_handlers() {
            dispatcher.register(handler)?;
        }
        Ok(dispatcher)
    }

    /// Register a handler and claim its verbs.
    pub fn register(&mut self, handler: Box<dyn ActionHandler>) -> EngineResult<()> {
        let name = handler.name().to_string();
        if handler.synonyms().is_empty() {
            return Err(EngineError::NoSynonyms(name));
        }
        if handler.syntax().is_empty() {
            return Err(EngineError::EmptySyntax(name));
        }
        let rules = compile_syntax(handler.as_ref()).map_err(|reason| {
            EngineError::MalformedSyntax {
                handler: name.clone(),
                reason,
            }
        })?;

        let index = self.handlers.len();
        let mut claimed: Vec<String> = Vec::new();
        for verb in handler.synonyms() {
            let verb = verb.to_lowercase();
            if let Some(&owner) = self.verbs.get(&verb) {
                return Err(EngineError::SynonymCollision {
                    verb,
                    first: self.handlers[owner].handler.name().to_string(),
                    second: name,
                });
            }
            if claimed.contains(&verb) {
                return Err(EngineError::SynonymCollision {
                    verb,
                    first: name.clone(),
                    second: name,
                });
            }
            claimed.push(verb);
        }

        debug!(handler = %name, verbs = claimed.len(), rules = rules.len(), "handler_registered");
        for verb in claimed {
            self.verbs.insert(verb, index);
        }
        self.handlers.push(Registered { handler, rules });
        Ok(())
    }

    /// Builder-style [`Dispatcher::register`].
    pub fn with_handler(mut self, handler: Box<dyn ActionHandler>) -> EngineResult<Self> {
        self.register(handler)?;
        Ok(self)
    }

    /// Choose the handler and first matching rule for a command.
    pub fn route(&self, command: &Command) -> Result<Route, Denial> {
        let Some(&handler) = self.verbs.get(command.verb()) else {
            return Err(Denial::new(
                DenialKind::NoHandlerForVerb,
                messages::unknown_verb(command.verb()),
            ));
        };
        let rules = &self.handlers[handler].rules;
        if let Some(rule) = rules.iter().position(|r| r.matches(command)) {
            return Ok(Route { handler, rule });
        }

        // The player gave fewer objects than any rule wants: ask for one.
        let fewest = rules.iter().map(SyntaxRule::slot_count).min().unwrap_or(0);
        let message = if command.object_count() < fewest {
            messages::what(&command.display_verb())
        } else {
            messages::partial_understanding(command.verb())
        };
        Err(Denial::new(DenialKind::NoMatchingSyntax, message))
    }

    /// The handler at a route.
    pub fn handler(&self, index: usize) -> Option<&dyn ActionHandler> {
        self.handlers.get(index).map(|r| r.handler.as_ref())
    }

    /// The rule at a route.
    pub fn rule(&self, route: Route) -> Option<&SyntaxRule> {
        self.handlers.get(route.handler)?.rules.get(route.rule)
    }

    /// The handler that owns a verb.
    pub fn handler_for(&self, verb: &str) -> Option<&dyn ActionHandler> {
        self.verbs
            .get(&verb.to_lowercase())
            .and_then(|&i| self.handler(i))
    }

    /// Every claimed verb, sorted.
    pub fn verbs(&self) -> Vec<&str> {
        let mut verbs: Vec<&str> = self.verbs.keys().map(String::as_str).collect();
        verbs.sort_unstable();
        verbs
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionContext, ActionResult, Processed};

    #[derive(Debug)]
    struct Fake {
        name: &'static str,
        synonyms: &'static [&'static str],
        syntax: &'static [&'static str],
    }

    impl ActionHandler for Fake {
        fn name(&self) -> &str {
            self.name
        }
        fn synonyms(&self) -> &'static [&'static str] {
            self.synonyms
        }
        fn syntax(&self) -> &'static [&'static str] {
            self.syntax
        }
        fn process(&self, _ctx: &mut ActionContext<'_>) -> EngineResult<Processed> {
            Ok(Processed::Done(ActionResult::default()))
        }
    }

    fn fake(name: &'static str, synonyms: &'static [&'static str]) -> Box<dyn ActionHandler> {
        Box::new(Fake {
            name,
            synonyms,
            syntax: &["VERB DIRECT"],
        })
    }

    #[test]
    fn collision_is_fatal() {
        let mut d = Dispatcher::new();
        d.register(fake("push", &["push", "shove"])).unwrap();
        let err = d.register(fake("move", &["move", "shove"])).unwrap_err();
        match err {
            EngineError::SynonymCollision {
                verb,
                first,
                second,
            } => {
                assert_eq!(verb, "shove");
                assert_eq!(first, "push");
                assert_eq!(second, "move");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(d.len(), 1);
        assert!(d.handler_for("move").is_none());
    }

    #[test]
    fn declaration_errors() {
        let mut d = Dispatcher::new();
        assert!(matches!(
            d.register(fake("mute", &[])),
            Err(EngineError::NoSynonyms(_))
        ));
        assert!(matches!(
            d.register(Box::new(Fake {
                name: "shapeless",
                synonyms: &["blob"],
                syntax: &[],
            })),
            Err(EngineError::EmptySyntax(_))
        ));
        assert!(matches!(
            d.register(Box::new(Fake {
                name: "backwards",
                synonyms: &["flip"],
                syntax: &["DIRECT VERB"],
            })),
            Err(EngineError::MalformedSyntax { .. })
        ));
        assert!(d.is_empty());
    }

    #[test]
    fn routes_by_synonym() {
        let d = Dispatcher::new()
            .with_handler(fake("push", &["push", "shove"]))
            .unwrap();
        let route = d.route(&Command::new("shove").with_direct("rock")).unwrap();
        assert_eq!(route, Route { handler: 0, rule: 0 });
        assert_eq!(d.verbs(), vec!["push", "shove"]);
    }

    #[test]
    fn unknown_verb_is_denied() {
        let d = Dispatcher::new();
        let denial = d.route(&Command::new("xyzzy")).unwrap_err();
        assert_eq!(denial.kind, DenialKind::NoHandlerForVerb);
    }

    #[test]
    fn wrong_shape_is_denied() {
        let d = Dispatcher::new()
            .with_handler(Box::new(Fake {
                name: "climb",
                synonyms: &["climb"],
                syntax: &["VERB ON DIRECT"],
            }))
            .unwrap();
        let denial = d.route(&Command::new("climb").with_direct("table")).unwrap_err();
        assert_eq!(denial.kind, DenialKind::NoMatchingSyntax);
        assert_eq!(denial.message, "I only understood you as far as wanting to climb.");
    }

    #[test]
    fn standard_handlers_register_cleanly() {
        let d = Dispatcher::standard().unwrap();
        assert_eq!(d.len(), 11);
        for verb in ["kick", "punt", "scale", "slice", "grab", "z", "load", "holler"] {
            assert!(d.handler_for(verb).is_some(), "{verb} not registered");
        }
    }
}
