//! `verbs::look` module
//!
//! What `look` says about words that name no thing: the room itself, the player's pockets,
//! the ways out, the credits, or what lies in a given direction.

use parley_data::Session;

use crate::lookup::normalize_key;
use crate::output::Output;
use crate::verbs::inventory::{exits_listing, inventory_listing};
use crate::verbs::movement::expand_direction;
use crate::world::World;

const ROOM_WORDS: [&str; 4] = ["", "around", "room", "here"];
const INVENTORY_WORDS: [&str; 5] = ["inventory", "pockets", "bag", "backpack", "items"];
const EXIT_WORDS: [&str; 5] = ["exits", "exit", "doors", "ways out", "directions"];

/// Custom fallback for `look`.
pub fn look_around(session: &Session, world: &World, subject: &str) -> Option<Output> {
    let word = normalize_key(subject);
    let room = world.current_room(session)?;

    if ROOM_WORDS.contains(&word.as_str()) || normalize_key(&room.name) == word {
        return Some(Output::say(room.describe(session)));
    }
    if INVENTORY_WORDS.contains(&word.as_str()) {
        return Some(Output::say(inventory_listing(session, world)));
    }
    if EXIT_WORDS.contains(&word.as_str()) {
        return Some(Output::say(exits_listing(session, world)));
    }
    if word == "credits" {
        return (!world.credits.is_empty()).then(|| Output::say(world.credits.clone()));
    }

    let direction = expand_direction(&word);
    let target = room.exits_for(session).remove(&direction)?;
    Some(Output::say(match world.get_room(&target) {
        Some(destination) if session.has_seen(&target) => format!("To the {direction} is the {}.", destination.name),
        _ => format!("You don't know what's {direction} of here."),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::process_output;
    use crate::room::Room;

    fn world() -> World {
        World::new("w", "hall")
            .room(
                Room::new("hall", "great hall")
                    .described("Banners hang from the rafters.")
                    .exit("east", "study")
                    .exit("west", "kitchen"),
            )
            .room(Room::new("study", "study"))
            .room(Room::new("kitchen", "kitchen"))
            .credits("Written by the hall's ghost.")
    }

    fn say(session: &Session, word: &str) -> Option<String> {
        look_around(session, &world(), word)
            .and_then(|output| process_output(&output, session, "look"))
            .map(|result| result.message)
    }

    #[test]
    fn room_words_describe_the_room() {
        let session = Session::new("s", "w", "hall");
        for word in ["", "around", "here", "the great hall"] {
            assert_eq!(say(&session, word).as_deref(), Some("Banners hang from the rafters."));
        }
    }

    #[test]
    fn keywords_list_things() {
        let session = Session::new("s", "w", "hall");
        assert_eq!(say(&session, "pockets").as_deref(), Some("You aren't carrying anything."));
        assert_eq!(say(&session, "exits").as_deref(), Some("You can go east or west."));
        assert_eq!(say(&session, "credits").as_deref(), Some("Written by the hall's ghost."));
    }

    #[test]
    fn directions_depend_on_what_was_seen() {
        let mut session = Session::new("s", "w", "hall");
        session.seen.insert("study".into());
        assert_eq!(say(&session, "e").as_deref(), Some("To the east is the study."));
        assert_eq!(say(&session, "west").as_deref(), Some("You don't know what's west of here."));
        assert_eq!(say(&session, "up"), None);
        assert_eq!(say(&session, "unicorn"), None);
    }
}
