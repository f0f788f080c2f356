//! `verbs::inventory` module
//!
//! Listing what the player carries and where they can go.

use parley_data::{Sentence, Session};

use crate::output::Output;
use crate::verbs::VerbHandler;
use crate::world::World;

/// Join words for speech: "a", "a and b", "a, b, and c".
pub fn join_list(items: &[String], conjunction: &str) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} {conjunction} {second}"),
        [init @ .., last] => format!("{}, {conjunction} {last}", init.join(", ")),
    }
}

pub fn inventory_listing(session: &Session, world: &World) -> String {
    let names = session
        .inventory
        .iter()
        .filter_map(|id| world.get_item(id))
        .map(|item| item.display_name().to_string())
        .collect::<Vec<_>>();
    if names.is_empty() {
        "You aren't carrying anything.".to_string()
    } else {
        format!("You're carrying {}.", join_list(&names, "and"))
    }
}

/// The exits of the current room, naming destinations the player has already seen.
pub fn exits_listing(session: &Session, world: &World) -> String {
    let Some(room) = world.current_room(session) else {
        return "There's no obvious way out.".to_string();
    };
    let ways = room
        .exits_for(session)
        .into_iter()
        .map(|(direction, target)| match world.get_room(&target) {
            Some(destination) if session.has_seen(&target) => format!("{direction} to the {}", destination.name),
            _ => direction,
        })
        .collect::<Vec<_>>();
    if ways.is_empty() {
        "There's no obvious way out.".to_string()
    } else {
        format!("You can go {}.", join_list(&ways, "or"))
    }
}

/// The `inventory` verb.
pub struct Inventory;

impl VerbHandler for Inventory {
    fn handle(&self, session: &Session, world: &World, _sentence: &Sentence) -> Option<Output> {
        Some(Output::say(inventory_listing(session, world)))
    }
}

/// The `exits` verb.
pub struct ExitList;

impl VerbHandler for ExitList {
    fn handle(&self, session: &Session, world: &World, _sentence: &Sentence) -> Option<Output> {
        Some(Output::say(exits_listing(session, world)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::Room;
    use crate::thing::Thing;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| (*item).to_string()).collect()
    }

    #[test]
    fn join_list_reads_naturally() {
        assert_eq!(join_list(&[], "and"), "");
        assert_eq!(join_list(&words(&["a lamp"]), "and"), "a lamp");
        assert_eq!(join_list(&words(&["a lamp", "a rope"]), "and"), "a lamp and a rope");
        assert_eq!(join_list(&words(&["north", "south", "up"]), "or"), "north, south, or up");
    }

    #[test]
    fn inventory_names_carried_items() {
        let world = World::new("w", "hall")
            .item(Thing::new(&["lamp"]).with_id("lamp").named("a brass lamp"))
            .item(Thing::new(&["key"]).with_id("key").named("a small key"));
        let mut session = Session::new("s", "w", "hall");
        assert_eq!(inventory_listing(&session, &world), "You aren't carrying anything.");
        session.inventory.insert("lamp".into());
        session.inventory.insert("key".into());
        assert_eq!(inventory_listing(&session, &world), "You're carrying a small key and a brass lamp.");
    }

    #[test]
    fn exits_name_seen_destinations() {
        let world = World::new("w", "hall")
            .room(Room::new("hall", "hall").exit("east", "study").exit("up", "attic"))
            .room(Room::new("study", "study"))
            .room(Room::new("attic", "attic"))
            .room(Room::new("cupboard", "cupboard"));
        let mut session = Session::new("s", "w", "hall");
        session.seen.insert("study".into());
        assert_eq!(exits_listing(&session, &world), "You can go east to the study or up.");

        session.room = "cupboard".into();
        assert_eq!(exits_listing(&session, &world), "There's no obvious way out.");
    }
}
