//! Turning raw input into resolved commands.

mod resolver;
mod sentence;

pub use resolver::{fuzzy_match, resolve_noun};
pub use sentence::{Sentence, split_sentence};

use tw_core::World;

use crate::command::Command;
use crate::error::ParseError;

/// Parse a line of input and resolve its nouns against the world.
pub fn parse_command(world: &World, input: &str) -> Result<Command, ParseError> {
    let sentence = split_sentence(input).ok_or(ParseError::Empty)?;

    let mut command = Command::new(&sentence.verb).with_raw(input.trim());
    for particle in &sentence.particles {
        command = command.with_modifier(particle);
    }

    let mut phrases = sentence.phrases.iter();
    if let Some(phrase) = phrases.next() {
        let id = resolve_noun(world, phrase)
            .ok_or_else(|| ParseError::UnknownNoun(phrase.clone()))?;
        command = command.with_direct(id);
    }
    if let Some(phrase) = phrases.next() {
        let id = resolve_noun(world, phrase)
            .ok_or_else(|| ParseError::UnknownNoun(phrase.clone()))?;
        command = command.with_indirect(id);
    }
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tw_core::{Entity, EntityId, Flag};

    fn world() -> World {
        let mut world = World::new(
            tw_core::WorldMeta::new("Parse"),
            Entity::player("me").in_location("kitchen"),
        )
        .unwrap();
        world
            .add_entity(Entity::location("kitchen", "Kitchen").with_flag(Flag::Lit))
            .unwrap();
        world
            .add_entity(Entity::item("rope", "rope").in_location("kitchen"))
            .unwrap();
        world
            .add_entity(
                Entity::item("knife", "bread knife")
                    .with_synonym("knife")
                    .in_location("kitchen"),
            )
            .unwrap();
        world
    }

    #[test]
    fn verb_only() {
        let cmd = parse_command(&world(), "Wait").unwrap();
        assert_eq!(cmd.verb(), "wait");
        assert_eq!(cmd.object_count(), 0);
    }

    #[test]
    fn direct_and_indirect_with_particle() {
        let cmd = parse_command(&world(), "cut the rope with the knife").unwrap();
        assert_eq!(cmd.verb(), "cut");
        assert_eq!(cmd.direct(), Some(&EntityId::from("rope")));
        assert_eq!(cmd.indirect(), Some(&EntityId::from("knife")));
        assert!(cmd.has_modifier("with"));
        assert_eq!(cmd.raw(), "cut the rope with the knife");
    }

    #[test]
    fn leading_particle() {
        let cmd = parse_command(&world(), "climb on rope").unwrap();
        assert!(cmd.has_modifier("on"));
        assert_eq!(cmd.direct(), Some(&EntityId::from("rope")));
    }

    #[test]
    fn reflexive_pronoun_is_player() {
        let cmd = parse_command(&world(), "cut myself").unwrap();
        assert_eq!(cmd.direct(), Some(&EntityId::from("me")));
    }

    #[test]
    fn errors() {
        assert_eq!(parse_command(&world(), "  "), Err(ParseError::Empty));
        assert_eq!(
            parse_command(&world(), "kick unicorn"),
            Err(ParseError::UnknownNoun("unicorn".into()))
        );
    }
}
