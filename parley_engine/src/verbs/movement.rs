//! `verbs::movement` module
//!
//! Handlers for verbs that change the player's room: `move` (by direction) and `moveTo`
//! (by direction, exit thing, or destination name).

use log::{info, warn};
use parley_data::{ActionResult, Sentence, Session, SessionDiff};

use crate::immutable::set_add;
use crate::lookup::{find_candidates, normalize_key};
use crate::output::Output;
use crate::room::Room;
use crate::verbs::VerbHandler;
use crate::verbs::inventory::join_list;
use crate::world::World;

/// Expand a direction abbreviation ("n", "sw", "u") to its full name.
pub fn expand_direction(direction: &str) -> String {
    let direction = normalize_key(direction);
    let full = match direction.as_str() {
        "n" => "north",
        "s" => "south",
        "e" => "east",
        "w" => "west",
        "ne" => "northeast",
        "nw" => "northwest",
        "se" => "southeast",
        "sw" => "southwest",
        "u" => "up",
        "d" => "down",
        other => other,
    };
    full.to_string()
}

/// Walk from the session's room in `direction`.
///
/// `direction` may be an abbreviation, `back`, or a word for a visible thing that leads
/// somewhere. The result moves the player, marks both rooms as seen, remembers the way back,
/// and narrates the arrival followed by the ambient output of the new room and of every
/// active effect.
pub fn go(session: &Session, world: &World, direction: &str) -> Output {
    let Some(here) = world.current_room(session) else {
        return Output::say("You can't go anywhere from here.");
    };

    let mut direction = expand_direction(direction);
    if direction == "back" {
        match &session.came_from {
            Some(back) => direction.clone_from(back),
            None => return Output::say("You haven't come from anywhere."),
        }
    }

    let exits = here.exits_for(session);
    if !exits.contains_key(&direction)
        && let Some(lead) = find_candidates(session, world, &direction)
            .into_iter()
            .find_map(|thing| thing.exit.clone())
    {
        direction = lead;
    }

    let Some(destination_id) = exits.get(&direction) else {
        return Output::say(format!("You can't go {direction} from here."));
    };
    if let Some(block) = here.blocked(&direction, session) {
        info!("session '{}' blocked going {direction} from '{}'", session.id, here.id);
        return Output::say(block);
    }
    let Some(destination) = world.get_room(destination_id) else {
        warn!("exit '{direction}' of '{}' leads to unknown room '{destination_id}'", here.id);
        return Output::say(format!("You can't go {direction} from here."));
    };

    info!("session '{}' moves {direction} from '{}' to '{}'", session.id, here.id, destination.id);
    arrive(session, world, here, destination)
}

fn arrive(session: &Session, world: &World, from: &Room, to: &Room) -> Output {
    let back = to
        .exits_for(session)
        .into_iter()
        .find_map(|(direction, target)| (target == from.id).then_some(direction))
        .unwrap_or_default();
    let diff = SessionDiff::default()
        .with_room(to.id.as_str())
        .with_seen(set_add(&session.seen, [from.id.as_str(), to.id.as_str()]))
        .with_came_from(back);

    let message = if session.has_seen(&to.id) {
        format!("You're back in the {}.", to.name)
    } else {
        to.describe(&session.apply(&diff))
    };

    let mut steps = vec![Output::Leaf(ActionResult::say(message).with_update(diff))];
    if let Some(ambient) = &to.ambient {
        steps.push(Output::Derived(ambient.clone()));
    }
    steps.extend(
        session
            .effects
            .iter()
            .filter_map(|id| world.effects.get(id))
            .filter_map(|effect| effect.ambient.clone())
            .map(Output::Derived),
    );
    Output::Sequence(steps)
}

/// The `move` verb.
pub struct Movement;

impl VerbHandler for Movement {
    fn handle(&self, session: &Session, world: &World, sentence: &Sentence) -> Option<Output> {
        if let Some(direction) = sentence.subject.as_deref().filter(|word| !word.trim().is_empty()) {
            return Some(go(session, world, direction));
        }

        let room = world.current_room(session)?;
        let exits = room.exits_for(session);
        let mut directions = exits.keys();
        Some(match (directions.next(), directions.next()) {
            (Some(only), None) => go(session, world, only),
            (None, _) => Output::say("There's no way out of here."),
            _ => Output::say(format!(
                "Which way do you want to go? You can go {}.",
                join_list(&exits.keys().cloned().collect::<Vec<_>>(), "or")
            )),
        })
    }
}

/// The `moveTo` verb.
pub struct MoveToward;

impl VerbHandler for MoveToward {
    fn handle(&self, session: &Session, world: &World, sentence: &Sentence) -> Option<Output> {
        let Some(subject) = sentence.subject.as_deref().map(normalize_key).filter(|word| !word.is_empty()) else {
            return Some(Output::say("Where do you want to go?"));
        };
        let room = world.current_room(session)?;
        let exits = room.exits_for(session);

        if exits.contains_key(&expand_direction(&subject)) {
            return Some(go(session, world, &subject));
        }
        if let Some(lead) = find_candidates(session, world, &subject)
            .into_iter()
            .find_map(|thing| thing.exit.as_deref())
        {
            return Some(go(session, world, lead));
        }
        if normalize_key(&room.name) == subject || room.id == subject {
            return Some(Output::say(format!("You're already in the {}.", room.name)));
        }

        let toward = exits.iter().find_map(|(direction, target)| {
            world
                .get_room(target)
                .filter(|destination| normalize_key(&destination.name) == subject || destination.id == subject)
                .map(|_| direction)
        });
        Some(match toward {
            Some(direction) => go(session, world, direction),
            None => Output::say(format!("You can't get to the {subject} from here.")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::process_output;
    use crate::thing::Thing;
    use crate::world::Effect;

    fn world() -> World {
        World::new("cottage", "pantry")
            .room(
                Room::new("pantry", "pantry")
                    .described("Shelves of jars.")
                    .exit("north", "kitchen")
                    .thing(Thing::new(&["curtain"]).leads("north")),
            )
            .room(
                Room::new("kitchen", "kitchen")
                    .described("A warm kitchen.")
                    .exit("south", "pantry")
                    .exit("down", "cellar")
                    .locked("down", |session| {
                        (!session.carries("candle")).then(|| "The cellar is pitch black.".to_string())
                    })
                    .ambient(|_, _| Some(Output::say("The kettle whistles."))),
            )
            .room(Room::new("cellar", "cellar").described("Cold stone.").exit("up", "kitchen"))
            .effect(Effect::new("hungry").ambient(|_, _| Some(Output::say("Your stomach growls."))))
    }

    fn resolve(handler: &dyn VerbHandler, session: &Session, sentence: Sentence) -> ActionResult {
        let output = handler.handle(session, &world(), &sentence).unwrap();
        process_output(&output, session, "move").unwrap()
    }

    #[test]
    fn first_visit_describes_then_ambient() {
        let session = Session::new("s", "cottage", "pantry");
        let result = resolve(&Movement, &session, Sentence::about("n"));
        assert_eq!(result.message, "A warm kitchen. The kettle whistles.");

        let update = result.update.unwrap();
        assert_eq!(update.room.as_deref(), Some("kitchen"));
        let seen = update.seen.unwrap();
        assert!(seen.contains("pantry") && seen.contains("kitchen"));
        assert_eq!(update.came_from.as_deref(), Some("south"));
    }

    #[test]
    fn later_visits_are_short_and_effects_narrate() {
        let mut session = Session::new("s", "cottage", "kitchen");
        session.seen.insert("pantry".into());
        session.effects.insert("hungry".into());
        session.came_from = Some("south".into());
        let result = resolve(&Movement, &session, Sentence::about("back"));
        assert_eq!(result.message, "You're back in the pantry. Your stomach growls.");
        assert_eq!(result.update.unwrap().came_from.as_deref(), Some("north"));
    }

    #[test]
    fn no_subject_with_one_exit_takes_it() {
        let session = Session::new("s", "cottage", "pantry");
        let explicit = resolve(&Movement, &session, Sentence::about("north"));
        let implicit = resolve(&Movement, &session, Sentence::new());
        assert_eq!(explicit, implicit);
    }

    #[test]
    fn no_subject_with_many_exits_asks() {
        let session = Session::new("s", "cottage", "kitchen");
        let result = resolve(&Movement, &session, Sentence::new());
        assert_eq!(result.message, "Which way do you want to go? You can go down or south.");
    }

    #[test]
    fn locks_and_unknown_directions() {
        let mut session = Session::new("s", "cottage", "kitchen");
        assert_eq!(resolve(&Movement, &session, Sentence::about("down")).message, "The cellar is pitch black.");
        assert_eq!(resolve(&Movement, &session, Sentence::about("west")).message, "You can't go west from here.");
        session.inventory.insert("candle".into());
        let result = resolve(&Movement, &session, Sentence::about("d"));
        assert_eq!(result.update.unwrap().room.as_deref(), Some("cellar"));
    }

    #[test]
    fn exit_things_and_room_names() {
        let session = Session::new("s", "cottage", "pantry");
        let through = resolve(&MoveToward, &session, Sentence::about("the curtain"));
        assert_eq!(through.update.unwrap().room.as_deref(), Some("kitchen"));

        let by_name = resolve(&MoveToward, &session, Sentence::about("kitchen"));
        assert_eq!(by_name.update.unwrap().room.as_deref(), Some("kitchen"));

        assert_eq!(
            resolve(&MoveToward, &session, Sentence::about("pantry")).message,
            "You're already in the pantry."
        );
        assert_eq!(
            resolve(&MoveToward, &session, Sentence::about("cellar")).message,
            "You can't get to the cellar from here."
        );
    }

    #[test]
    fn back_without_history() {
        let session = Session::new("s", "cottage", "pantry");
        assert_eq!(resolve(&Movement, &session, Sentence::about("back")).message, "You haven't come from anywhere.");
    }
}
