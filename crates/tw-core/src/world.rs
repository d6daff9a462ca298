use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::change::{Attribute, ChangeHistory, ChangeRecord, StateChange, Value};
use crate::entity::{Entity, EntityId, EntityKind, Parent};
use crate::error::{CoreError, CoreResult};

/// Metadata about the world itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldMeta {
    /// Title of the game.
    pub name: String,
    /// Free-text blurb.
    pub description: String,
    /// Content schema version.
    pub schema_version: u32,
}

impl WorldMeta {
    /// Create metadata with the given title.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            schema_version: 1,
        }
    }
}

/// The central world model. Owns all entities, the global counters and the
/// change history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    /// Metadata about the game.
    pub meta: WorldMeta,
    entities: BTreeMap<EntityId, Entity>,
    player: EntityId,
    score: i64,
    moves: u64,
    history: ChangeHistory,
}

impl World {
    /// Create a world containing only the player.
    pub fn new(meta: WorldMeta, player: Entity) -> CoreResult<Self> {
        if player.kind != EntityKind::Player {
            return Err(CoreError::MissingPlayer);
        }
        let id = player.id.clone();
        let mut entities = BTreeMap::new();
        entities.insert(id.clone(), player);
        Ok(Self {
            meta,
            entities,
            player: id,
            score: 0,
            moves: 0,
            history: ChangeHistory::new(),
        })
    }

    // -----------------------------------------------------------------------
    // Content setup
    // -----------------------------------------------------------------------

    /// Add an entity while building content. Returns the entity's ID.
    ///
    /// Identifiers are never reused: adding a second entity with an existing
    /// ID is rejected.
    pub fn add_entity(&mut self, entity: Entity) -> CoreResult<EntityId> {
        if self.entities.contains_key(&entity.id) {
            return Err(CoreError::DuplicateEntity(entity.id));
        }
        if entity.kind == EntityKind::Player {
            return Err(CoreError::DuplicateEntity(entity.id));
        }
        let id = entity.id.clone();
        self.entities.insert(id.clone(), entity);
        Ok(id)
    }

    /// Check that every parent reference names an entity of a fitting kind.
    pub fn validate(&self) -> CoreResult<()> {
        for entity in self.entities.values() {
            self.check_parent(&entity.id, &entity.parent)?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// Get an entity by ID.
    pub fn get_entity(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Get an entity by ID, failing if it does not exist.
    pub fn entity(&self, id: &EntityId) -> CoreResult<&Entity> {
        self.entities
            .get(id)
            .ok_or_else(|| CoreError::EntityNotFound(id.clone()))
    }

    /// Whether an entity with this ID exists.
    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// The player's entity ID.
    pub fn player_id(&self) -> &EntityId {
        &self.player
    }

    /// The player entity.
    pub fn player(&self) -> CoreResult<&Entity> {
        self.entity(&self.player)
    }

    /// The location the player is standing in.
    pub fn player_location(&self) -> Option<&EntityId> {
        self.location_of(&self.player)
    }

    /// The location that ultimately contains an entity.
    ///
    /// A location is its own location.
    pub fn location_of(&self, id: &EntityId) -> Option<&EntityId> {
        let mut current = self.entities.get(id)?;
        // Bounded walk: a malformed parent cycle ends the search.
        for _ in 0..=self.entities.len() {
            if current.kind == EntityKind::Location {
                return Some(&current.id);
            }
            current = match &current.parent {
                Parent::Nowhere => return None,
                Parent::Player => self.entities.get(&self.player)?,
                Parent::Location(l) | Parent::Item(l) => self.entities.get(l)?,
            };
        }
        None
    }

    /// Find an entity whose name or synonym matches (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.values().find(|e| e.answers_to(name))
    }

    /// All entities in ID order.
    pub fn all_entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// All entities of a kind, in ID order.
    pub fn entities_by_kind(&self, kind: EntityKind) -> Vec<&Entity> {
        self.entities.values().filter(|e| e.kind == kind).collect()
    }

    /// Entities directly inside a parent.
    pub fn children_of(&self, parent: &Parent) -> Vec<&Entity> {
        self.entities
            .values()
            .filter(|e| &e.parent == parent)
            .collect()
    }

    /// The current score.
    pub fn score(&self) -> i64 {
        self.score
    }

    /// The number of moves taken.
    pub fn moves(&self) -> u64 {
        self.moves
    }

    /// The append-only log of applied changes.
    pub fn history(&self) -> &ChangeHistory {
        &self.history
    }

    /// Number of entities, including the player.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// The current value of an attribute. Absent properties read as `None`.
    pub fn value_of(&self, id: &EntityId, attribute: &Attribute) -> CoreResult<Option<Value>> {
        let entity = self.entity(id)?;
        Ok(match attribute {
            Attribute::Flag(flag) => Some(Value::Bool(entity.has(*flag))),
            Attribute::Parent => Some(Value::Parent(entity.parent.clone())),
            Attribute::Score => Some(Value::Int(self.score)),
            Attribute::Moves => Some(Value::Int(self.moves as i64)),
            Attribute::Property(key) => entity.properties.get(key).cloned(),
        })
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Check a change against the current state without applying it.
    pub fn check(&self, change: &StateChange) -> CoreResult<()> {
        let entity = self.entity(&change.entity)?;

        if !change.attribute.accepts(&change.new_value) {
            return Err(CoreError::TypeMismatch {
                entity: change.entity.clone(),
                attribute: change.attribute.clone(),
                expected: change.attribute.expected_type(),
                found: change.new_value.value_type().to_string(),
            });
        }

        match (&change.attribute, &change.new_value) {
            (Attribute::Parent, Value::Parent(parent)) => {
                if entity.kind == EntityKind::Location {
                    return Err(CoreError::InvalidParent {
                        entity: change.entity.clone(),
                        reason: "locations cannot be moved".to_string(),
                    });
                }
                self.check_parent(&change.entity, parent)
            }
            (Attribute::Moves, Value::Int(n)) if *n < 0 => Err(CoreError::TypeMismatch {
                entity: change.entity.clone(),
                attribute: Attribute::Moves,
                expected: "non-negative int",
                found: n.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Apply changes in order, recording each in the history.
    ///
    /// Records are stamped with the wall clock. See [`World::apply_at`].
    pub fn apply(&mut self, changes: Vec<StateChange>) -> CoreResult<&[ChangeRecord]> {
        self.apply_at(changes, Utc::now())
    }

    /// Apply changes in order, stamping every appended record with `at`.
    ///
    /// Each change is checked against the state left by the changes before
    /// it. If any change fails, the world is rolled back and the history is
    /// left as it was. Returns the records that were appended.
    pub fn apply_at(
        &mut self,
        changes: Vec<StateChange>,
        at: DateTime<Utc>,
    ) -> CoreResult<&[ChangeRecord]> {
        let first = self.history.len() as u64;
        if changes.is_empty() {
            return Ok(self.history.since(first));
        }

        let saved = (self.entities.clone(), self.score, self.moves);
        let mut applied = Vec::with_capacity(changes.len());
        for change in changes {
            match self.check(&change).and_then(|()| self.apply_one(change)) {
                Ok(change) => applied.push((self.moves, change)),
                Err(err) => {
                    (self.entities, self.score, self.moves) = saved;
                    return Err(err);
                }
            }
        }

        for (turn, change) in applied {
            self.history.append(turn, change, at);
        }
        Ok(self.history.since(first))
    }

    /// Take over another world's entities, counters and metadata.
    ///
    /// The change history stays: it keeps growing across a restore.
    pub fn replace_state(&mut self, other: World) {
        let World {
            meta,
            entities,
            player,
            score,
            moves,
            history: _,
        } = other;
        self.meta = meta;
        self.entities = entities;
        self.player = player;
        self.score = score;
        self.moves = moves;
    }

    /// Advance the move counter by one and return the new count.
    pub fn advance_moves(&mut self) -> u64 {
        self.moves += 1;
        self.moves
    }

    fn apply_one(&mut self, mut change: StateChange) -> CoreResult<StateChange> {
        let prior = self.value_of(&change.entity, &change.attribute)?;
        if change.old_value.is_none() {
            change.old_value = prior;
        }

        match (&change.attribute, &change.new_value) {
            (Attribute::Score, Value::Int(n)) => self.score = *n,
            (Attribute::Moves, Value::Int(n)) => self.moves = *n as u64,
            (attribute, value) => {
                let entity = self
                    .entities
                    .get_mut(&change.entity)
                    .ok_or_else(|| CoreError::EntityNotFound(change.entity.clone()))?;
                match (attribute, value) {
                    (Attribute::Flag(flag), Value::Bool(true)) => {
                        entity.flags.insert(*flag);
                    }
                    (Attribute::Flag(flag), Value::Bool(false)) => {
                        entity.flags.remove(flag);
                    }
                    (Attribute::Parent, Value::Parent(parent)) => entity.parent = parent.clone(),
                    (Attribute::Property(key), value) => {
                        entity.properties.insert(key.clone(), value.clone());
                    }
                    _ => {
                        return Err(CoreError::TypeMismatch {
                            entity: change.entity.clone(),
                            attribute: change.attribute.clone(),
                            expected: change.attribute.expected_type(),
                            found: change.new_value.value_type().to_string(),
                        });
                    }
                }
            }
        }
        Ok(change)
    }

    fn check_parent(&self, id: &EntityId, parent: &Parent) -> CoreResult<()> {
        let invalid = |reason: &str| CoreError::InvalidParent {
            entity: id.clone(),
            reason: reason.to_string(),
        };
        match parent {
            Parent::Nowhere | Parent::Player => {
                if parent == &Parent::Player && id == &self.player {
                    return Err(invalid("the player cannot carry itself"));
                }
                Ok(())
            }
            Parent::Location(l) => match self.entities.get(l) {
                Some(e) if e.kind == EntityKind::Location => Ok(()),
                Some(_) => Err(invalid("parent is not a location")),
                None => Err(CoreError::EntityNotFound(l.clone())),
            },
            Parent::Item(i) => {
                match self.entities.get(i) {
                    Some(e) if e.kind == EntityKind::Item => {}
                    Some(_) => return Err(invalid("parent is not an item")),
                    None => return Err(CoreError::EntityNotFound(i.clone())),
                }
                let mut cursor = Some(i);
                for _ in 0..=self.entities.len() {
                    let Some(current) = cursor else { break };
                    if current == id {
                        return Err(invalid("containment cycle"));
                    }
                    cursor = self.entities.get(current).and_then(|e| match &e.parent {
                        Parent::Item(next) => Some(next),
                        _ => None,
                    });
                }
                Ok(())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Encode the whole world, history included, as JSON.
    pub fn to_json(&self) -> CoreResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a world previously produced by [`World::to_json`].
    pub fn from_json(bytes: &[u8]) -> CoreResult<Self> {
        let world: Self = serde_json::from_slice(bytes)?;
        world.validate()?;
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Flag;
    use proptest::prelude::*;

    fn test_world() -> World {
        let mut world = World::new(
            WorldMeta::new("Test World"),
            Entity::player("player").in_location("cave"),
        )
        .unwrap();
        world
            .add_entity(Entity::location("cave", "Cave").with_flag(Flag::Lit))
            .unwrap();
        world
            .add_entity(Entity::location("hall", "Hall"))
            .unwrap();
        world
            .add_entity(Entity::item("rock", "rock").in_location("cave"))
            .unwrap();
        world
            .add_entity(
                Entity::item("box", "wooden box")
                    .with_flag(Flag::Container)
                    .in_location("cave"),
            )
            .unwrap();
        world
    }

    #[test]
    fn add_and_get_entity() {
        let world = test_world();
        let rock = world.get_entity(&EntityId::from("rock")).unwrap();
        assert_eq!(rock.name, "rock");
        assert_eq!(world.entity_count(), 5);
        world.validate().unwrap();
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut world = test_world();
        let result = world.add_entity(Entity::item("rock", "another rock"));
        assert!(matches!(result, Err(CoreError::DuplicateEntity(_))));
    }

    #[test]
    fn player_location_follows_parents() {
        let world = test_world();
        assert_eq!(world.player_location(), Some(&EntityId::from("cave")));
        assert_eq!(
            world.location_of(&EntityId::from("rock")),
            Some(&EntityId::from("cave"))
        );
        assert_eq!(
            world.location_of(&EntityId::from("hall")),
            Some(&EntityId::from("hall"))
        );
    }

    #[test]
    fn apply_records_prior_values() {
        let mut world = test_world();
        let records = world
            .apply(vec![
                StateChange::touch("rock"),
                StateChange::move_to("rock", Parent::Player),
            ])
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].change.old_value, Some(Value::Bool(false)));
        assert_eq!(
            records[1].change.old_value,
            Some(Value::Parent(Parent::Location(EntityId::from("cave"))))
        );

        let rock = world.get_entity(&EntityId::from("rock")).unwrap();
        assert!(rock.has(Flag::Touched));
        assert_eq!(rock.parent, Parent::Player);
        assert_eq!(world.history().len(), 2);
    }

    #[test]
    fn setting_a_set_flag_is_still_recorded() {
        let mut world = test_world();
        world.apply(vec![StateChange::touch("rock")]).unwrap();
        world.apply(vec![StateChange::touch("rock")]).unwrap();

        assert_eq!(world.history().len(), 2);
        assert_eq!(
            world.history().records()[1].change.old_value,
            Some(Value::Bool(true))
        );
    }

    #[test]
    fn last_write_wins_within_a_batch() {
        let mut world = test_world();
        world
            .apply(vec![
                StateChange::property("rock", "color", Value::Text("grey".into())),
                StateChange::property("rock", "color", Value::Text("red".into())),
            ])
            .unwrap();
        let rock = world.get_entity(&EntityId::from("rock")).unwrap();
        assert_eq!(
            rock.properties.get("color"),
            Some(&Value::Text("red".into()))
        );
    }

    #[test]
    fn failing_batch_applies_nothing() {
        let mut world = test_world();
        let result = world.apply(vec![
            StateChange::touch("rock"),
            StateChange::touch("ghost"),
        ]);

        assert!(matches!(result, Err(CoreError::EntityNotFound(_))));
        assert!(world.history().is_empty());
        assert!(!world.get_entity(&EntityId::from("rock")).unwrap().has(Flag::Touched));
    }

    #[test]
    fn batch_is_checked_against_its_own_earlier_changes() {
        let mut world = test_world();
        world
            .add_entity(Entity::item("bag", "bag").with_flag(Flag::Container).in_location("cave"))
            .unwrap();
        let result = world.apply(vec![
            StateChange::move_to("box", Parent::Item(EntityId::from("bag"))),
            StateChange::move_to("bag", Parent::Item(EntityId::from("box"))),
        ]);

        assert!(matches!(result, Err(CoreError::InvalidParent { .. })));
        assert!(world.history().is_empty());
        world.validate().unwrap();
        assert_eq!(
            world.location_of(&EntityId::from("box")),
            Some(&EntityId::from("cave"))
        );
        assert_eq!(
            world.location_of(&EntityId::from("bag")),
            Some(&EntityId::from("cave"))
        );
    }

    #[test]
    fn failed_batch_rolls_back_counters() {
        let mut world = test_world();
        let result = world.apply(vec![
            StateChange::score("player", 50),
            StateChange::new("player", Attribute::Moves, Value::Int(9)),
            StateChange::touch("ghost"),
        ]);

        assert!(result.is_err());
        assert_eq!(world.score(), 0);
        assert_eq!(world.moves(), 0);
    }

    #[test]
    fn apply_at_stamps_the_given_time() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut first = test_world();
        let mut second = test_world();
        first.apply_at(vec![StateChange::touch("rock")], at).unwrap();
        second.apply_at(vec![StateChange::touch("rock")], at).unwrap();

        assert_eq!(first.history().records()[0].applied_at, at);
        assert_eq!(first, second);
    }

    #[test]
    fn replace_state_keeps_history() {
        let mut world = test_world();
        let earlier = world.clone();
        world.apply(vec![StateChange::touch("rock")]).unwrap();
        world.apply(vec![StateChange::score("player", 7)]).unwrap();
        world.advance_moves();

        world.replace_state(earlier);

        assert_eq!(world.history().len(), 2);
        assert_eq!(world.score(), 0);
        assert_eq!(world.moves(), 0);
        assert!(!world.get_entity(&EntityId::from("rock")).unwrap().has(Flag::Touched));
    }

    #[test]
    fn type_mismatch_rejected() {
        let mut world = test_world();
        let result = world.apply(vec![StateChange::new(
            "rock",
            Attribute::Flag(Flag::Open),
            Value::Int(3),
        )]);
        assert!(matches!(result, Err(CoreError::TypeMismatch { .. })));
    }

    #[test]
    fn containment_cycles_rejected() {
        let mut world = test_world();
        world
            .apply(vec![StateChange::move_to(
                "rock",
                Parent::Item(EntityId::from("box")),
            )])
            .unwrap();
        let result = world.apply(vec![StateChange::move_to(
            "box",
            Parent::Item(EntityId::from("rock")),
        )]);
        assert!(matches!(result, Err(CoreError::InvalidParent { .. })));
    }

    #[test]
    fn score_and_moves_are_global() {
        let mut world = test_world();
        world.apply(vec![StateChange::score("player", 10)]).unwrap();
        assert_eq!(world.score(), 10);
        assert_eq!(world.advance_moves(), 1);
        assert_eq!(world.moves(), 1);
        assert_eq!(world.history().records()[0].turn, 0);
    }

    #[test]
    fn json_round_trip_preserves_history() {
        let mut world = test_world();
        world.apply(vec![StateChange::touch("rock")]).unwrap();
        world.advance_moves();

        let bytes = world.to_json().unwrap();
        let restored = World::from_json(&bytes).unwrap();
        assert_eq!(restored, world);
    }

    proptest! {
        #[test]
        fn history_only_grows_in_order(batches in prop::collection::vec(0usize..4, 0..12)) {
            let mut world = test_world();
            let mut expected = 0usize;
            let mut previous: Vec<ChangeRecord> = Vec::new();

            for (turn, size) in batches.into_iter().enumerate() {
                let changes: Vec<StateChange> = (0..size)
                    .map(|i| StateChange::property("rock", "n", Value::Int((turn * 10 + i) as i64)))
                    .collect();
                world.apply(changes).unwrap();
                world.advance_moves();
                expected += size;

                prop_assert_eq!(world.history().len(), expected);
                prop_assert_eq!(&world.history().records()[..previous.len()], &previous[..]);
                previous = world.history().records().to_vec();
            }

            for (i, record) in world.history().iter().enumerate() {
                prop_assert_eq!(record.sequence, i as u64);
            }
        }
    }
}
