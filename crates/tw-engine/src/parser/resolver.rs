//! Noun resolution with fuzzy matching.

use strsim::jaro_winkler;
use tw_core::{EntityId, EntityKind, World};

/// Minimum similarity score for fuzzy matching (0.0-1.0).
const FUZZY_THRESHOLD: f64 = 0.8;

/// Words that always mean the player.
const REFLEXIVE: &[&str] = &["me", "myself", "self", "yourself"];

/// Resolve a noun phrase to an entity.
///
/// Exact name or synonym matches win, preferring entities in the player's
/// location. The last word of the phrase is tried on its own before falling
/// back to fuzzy matching on names.
pub fn resolve_noun(world: &World, phrase: &str) -> Option<EntityId> {
    let phrase = phrase.trim().to_lowercase();
    if REFLEXIVE.contains(&phrase.as_str()) {
        return Some(world.player_id().clone());
    }

    let here = world.player_location();
    let exact = |word: &str| -> Option<EntityId> {
        let mut candidates: Vec<_> = world
            .all_entities()
            .filter(|e| e.kind != EntityKind::Player && e.answers_to(word))
            .collect();
        candidates.sort_by_key(|e| world.location_of(&e.id) != here);
        candidates.first().map(|e| e.id.clone())
    };

    if let Some(id) = exact(&phrase) {
        return Some(id);
    }
    let head = phrase.split_whitespace().last().unwrap_or_default();
    let by_head = if head == phrase { None } else { exact(head) };
    by_head.or_else(|| {
        fuzzy_match(world, &phrase, FUZZY_THRESHOLD)
            .into_iter()
            .next()
            .map(|(id, _)| id)
    })
}

/// Entities whose name resembles the input, best first.
pub fn fuzzy_match(world: &World, input: &str, threshold: f64) -> Vec<(EntityId, f64)> {
    let input = input.to_lowercase();
    let mut matches: Vec<(EntityId, f64)> = world
        .all_entities()
        .filter(|e| e.kind != EntityKind::Player)
        .filter_map(|e| {
            let score = jaro_winkler(&input, &e.name.to_lowercase());
            (score >= threshold).then(|| (e.id.clone(), score))
        })
        .collect();

    matches.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    matches
}
