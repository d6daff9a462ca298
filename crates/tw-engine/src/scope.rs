//! Reachability and lighting queries.

use tw_core::{EntityId, EntityKind, Flag, Parent, World};

/// Answers "can the player act on this" and "can the player see".
pub trait Scope: std::fmt::Debug {
    /// Whether an entity can be acted upon from a location.
    fn is_reachable(&self, world: &World, entity: &EntityId, from: &EntityId) -> bool;

    /// Whether a location has light.
    fn is_lit(&self, world: &World, location: &EntityId) -> bool;
}

/// The containment-based scope rules.
///
/// An entity is reachable when its parent chain leads to the location or to
/// the player without passing through a closed container. The location and
/// the player are always reachable. A location is lit when it carries
/// [`Flag::Lit`] or a switched-on light source inside it can be seen.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardScope;

impl StandardScope {
    /// Walk the parent chain. `see_through` lets transparent containers pass.
    fn chain_reaches(world: &World, entity: &EntityId, from: &EntityId, see_through: bool) -> bool {
        if entity == from || entity == world.player_id() {
            return true;
        }
        let Some(mut current) = world.get_entity(entity) else {
            return false;
        };
        for _ in 0..=world.entity_count() {
            match &current.parent {
                Parent::Nowhere => return false,
                Parent::Player => return world.player_location() == Some(from),
                Parent::Location(location) => return location == from,
                Parent::Item(holder) => {
                    let Some(next) = world.get_entity(holder) else {
                        return false;
                    };
                    let closed = next.has(Flag::Container) && !next.has(Flag::Open);
                    if closed && !(see_through && next.has(Flag::Transparent)) {
                        return false;
                    }
                    current = next;
                }
            }
        }
        false
    }
}

impl Scope for StandardScope {
    fn is_reachable(&self, world: &World, entity: &EntityId, from: &EntityId) -> bool {
        Self::chain_reaches(world, entity, from, false)
    }

    fn is_lit(&self, world: &World, location: &EntityId) -> bool {
        if world.get_entity(location).is_some_and(|l| l.has(Flag::Lit)) {
            return true;
        }
        world
            .entities_by_kind(EntityKind::Item)
            .into_iter()
            .filter(|e| e.has(Flag::LightSource) && e.has(Flag::On))
            .any(|e| Self::chain_reaches(world, &e.id, location, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tw_core::{Entity, WorldMeta};

    fn world() -> World {
        let mut world = World::new(
            WorldMeta::new("Scope"),
            Entity::player("me").in_location("cave"),
        )
        .unwrap();
        world.add_entity(Entity::location("cave", "Cave")).unwrap();
        world.add_entity(Entity::location("hall", "Hall").with_flag(Flag::Lit)).unwrap();
        world.add_entity(Entity::item("rock", "rock").in_location("cave")).unwrap();
        world.add_entity(Entity::item("table", "table").in_location("hall")).unwrap();
        world
            .add_entity(
                Entity::item("chest", "chest")
                    .with_flag(Flag::Container)
                    .in_location("cave"),
            )
            .unwrap();
        world.add_entity(Entity::item("coin", "coin").in_item("chest")).unwrap();
        world
            .add_entity(
                Entity::item("jar", "jar")
                    .with_flag(Flag::Container)
                    .with_flag(Flag::Transparent)
                    .in_location("cave"),
            )
            .unwrap();
        world
            .add_entity(
                Entity::item("lamp", "lamp")
                    .with_flag(Flag::LightSource)
                    .with_parent(Parent::Player),
            )
            .unwrap();
        world
    }

    fn id(s: &str) -> EntityId {
        EntityId::from(s)
    }

    #[test]
    fn same_location_is_reachable() {
        let w = world();
        assert!(StandardScope.is_reachable(&w, &id("rock"), &id("cave")));
        assert!(StandardScope.is_reachable(&w, &id("cave"), &id("cave")));
        assert!(StandardScope.is_reachable(&w, &id("me"), &id("cave")));
        assert!(StandardScope.is_reachable(&w, &id("lamp"), &id("cave")));
    }

    #[test]
    fn other_location_is_not_reachable() {
        let w = world();
        assert!(!StandardScope.is_reachable(&w, &id("table"), &id("cave")));
        assert!(!StandardScope.is_reachable(&w, &id("ghost"), &id("cave")));
    }

    #[test]
    fn closed_container_blocks_reach() {
        let w = world();
        assert!(!StandardScope.is_reachable(&w, &id("coin"), &id("cave")));

        let mut opened = w.clone();
        opened
            .apply(vec![tw_core::StateChange::set_flag("chest", Flag::Open, true)])
            .unwrap();
        assert!(StandardScope.is_reachable(&opened, &id("coin"), &id("cave")));
    }

    #[test]
    fn lighting() {
        let mut w = world();
        assert!(StandardScope.is_lit(&w, &id("hall")));
        assert!(!StandardScope.is_lit(&w, &id("cave")));

        w.apply(vec![tw_core::StateChange::set_flag("lamp", Flag::On, true)])
            .unwrap();
        assert!(StandardScope.is_lit(&w, &id("cave")));
    }

    #[test]
    fn light_shines_through_transparent_container() {
        let mut w = world();
        w.add_entity(
            Entity::item("glowworm", "glowworm")
                .with_flag(Flag::LightSource)
                .with_flag(Flag::On)
                .in_item("jar"),
        )
        .unwrap();
        assert!(StandardScope.is_lit(&w, &id("cave")));
        assert!(!StandardScope.is_reachable(&w, &id("glowworm"), &id("cave")));
    }
}
