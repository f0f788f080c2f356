//! Thing Lookup
//!
//! Turns a word from the player into the things it could refer to. Candidates come from
//! three places, always in this order:
//!
//! - things contributed by the player's active effects
//! - items the player is carrying
//! - things in the current room that are visible and not gone
//!
//! Earlier sources shadow later ones: verb resolution takes the first candidate that can
//! handle the verb, so an effect's "shadow" beats the room's "shadow".

use log::{debug, warn};
use parley_data::Session;

use crate::thing::Thing;
use crate::world::World;

const ARTICLES: [&str; 4] = ["a ", "an ", "the ", "my "];

/// Lowercase, trim, and strip any leading articles ("the", "a", "an", "my").
pub fn normalize_key(raw: &str) -> String {
    let mut key = raw.trim().to_lowercase();
    while let Some(rest) = ARTICLES.iter().find_map(|article| key.strip_prefix(article)) {
        key = rest.trim_start().to_string();
    }
    key
}

/// Every thing `key` may refer to, in priority order.
pub fn find_candidates<'w>(session: &Session, world: &'w World, key: &str) -> Vec<&'w Thing> {
    let key = normalize_key(key);
    let mut found = Vec::new();
    if key.is_empty() {
        return found;
    }

    for effect_id in &session.effects {
        match world.effects.get(effect_id) {
            Some(effect) => found.extend(effect.things.iter().filter(|thing| thing.matches(&key))),
            None => warn!("session '{}' has unknown effect '{effect_id}'", session.id),
        }
    }

    found.extend(
        session
            .inventory
            .iter()
            .filter_map(|id| world.get_item(id))
            .filter(|thing| thing.matches(&key)),
    );

    if let Some(room) = world.current_room(session) {
        found.extend(room.things.iter().filter(|thing| {
            thing.matches(&key)
                && thing.is_visible(session)
                && !thing.id.as_deref().is_some_and(|id| session.is_gone(id))
        }));
    }

    debug!("lookup '{key}' in '{}': {} candidate(s)", session.room, found.len());
    found
}
