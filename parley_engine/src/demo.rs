//! The bundled demo world: a small cottage with a pantry, a kitchen and a cellar.
//!
//! It is what the `parley` binary plays, and the integration tests lean on it.

use parley_data::{ActionResult, Sentence, Session, SessionDiff, VerbName};

use crate::immutable::{map_set, set_add, set_remove};
use crate::output::Output;
use crate::room::Room;
use crate::thing::{Keyed, Reaction, Thing};
use crate::world::{Effect, World};

pub const DEMO_WORLD: &str = "cottage";

const LAMPLIGHT: &str = "lamplight";

/// A handler that moves a room item into the inventory.
fn take(id: &'static str, name: &'static str) -> impl Fn(&Session, &str) -> Option<Output> + Send + Sync + 'static {
    move |session: &Session, _: &str| {
        if session.carries(id) {
            return Some(Output::say(format!("You already have {name}.")));
        }
        let diff = SessionDiff::default()
            .with_inventory(set_add(&session.inventory, [id]))
            .with_gone(set_add(&session.gone, [id]));
        Some(ActionResult::say(format!("You pick up {name}.")).with_update(diff).into())
    }
}

fn lamp() -> Thing {
    Thing::new(&["lamp", "brass lamp", "lantern"])
        .with_id("lamp")
        .named("a brass lamp")
        .runs("look", |session, _| {
            Some(Output::say(if session.flag("lamp") == Some("lit") {
                "The lamp burns with a steady flame."
            } else {
                "An old brass lamp. It isn't lit."
            }))
        })
        .runs("take", take("lamp", "the brass lamp"))
        .runs("light", |session, _| {
            if !session.carries("lamp") {
                return Some(Output::say("You'd better pick it up first."));
            }
            if session.flag("lamp") == Some("lit") {
                return Some(Output::say("It's already lit."));
            }
            let diff = SessionDiff::default()
                .with_flags(map_set(&session.flags, "lamp", Some("lit")))
                .with_effects(set_add(&session.effects, [LAMPLIGHT]));
            Some(ActionResult::say("The wick catches and the lamp glows warmly.").with_update(diff).into())
        })
        .alias("use", "light")
}

fn cat() -> Thing {
    Thing::new(&["cat", "tabby"])
        .with_id("cat")
        .says("look", "A fat tabby cat, curled up by the hearth.")
        .says("attack", "You wouldn't dare.")
        .runs("talk", |session, _| {
            Some(if session.flag("cat") == Some("fed") {
                let farewell = ActionResult::say("The cat purrs and settles down to sleep. Thanks for playing!");
                Output::Leaf(farewell.closing())
            } else {
                Output::say("The cat meows pointedly in the direction of the cellar.")
            })
        })
        .keyed(
            "give",
            Keyed::new()
                .with(
                    "fish",
                    Reaction::run(|session, _| {
                        let diff = SessionDiff::default()
                            .with_inventory(set_remove(&session.inventory, "fish"))
                            .with_flags(map_set(&session.flags, "cat", Some("fed")));
                        Some(ActionResult::say("The cat devours the fish and starts to purr.").with_update(diff).into())
                    }),
                )
                .any("The cat sniffs it and looks away."),
        )
}

fn fish() -> Thing {
    Thing::new(&["fish", "salted fish"])
        .with_id("fish")
        .named("a salted fish")
        .says("look", "A whole fish, stiff with salt.")
        .says("eat", "It's far too salty.")
        .runs("take", take("fish", "a salted fish"))
}

/// Build the cottage.
pub fn demo_world() -> World {
    let world = World::new(DEMO_WORLD, "pantry")
        .sound("drip", "https://sounds.parley.invalid/drip.mp3")
        .credits("The cottage was built as a Parley demo. Thanks for playing.");
    let drip = world.play("drip");

    world
        .room(
            Room::new("pantry", "pantry")
                .described("You're in a cramped pantry. Shelves of jars line the walls, and a doorway leads north.")
                .exit("north", "kitchen")
                .thing(lamp())
                .thing(
                    Thing::new(&["jars", "jar", "shelves"])
                        .says("look", "Jars of pickled everything. Nothing you'd want to eat.")
                        .says("eat", "You think better of it."),
                )
                .thing(
                    Thing::new(&["doorway", "door"])
                        .leads("north")
                        .says("look", "Warm air drifts through from the kitchen."),
                )
                .phrase("leave", VerbName::Move, Sentence::about("north")),
        )
        .room(
            Room::new("kitchen", "kitchen")
                .described(
                    "A warm kitchen. A kettle sits on the stove, a cat dozes by the hearth, and a trapdoor \
                     in the floor leads down. The pantry is back to the south.",
                )
                .exit("south", "pantry")
                .exit("down", "cellar")
                .locked("down", |session| {
                    (session.flag("lamp") != Some("lit") || !session.carries("lamp"))
                        .then(|| "It's too dark to go down there without a light.".to_string())
                })
                .ambient(|session, _| {
                    (session.flag("cat") != Some("fed")).then(|| Output::say("The cat opens one eye and watches you."))
                })
                .thing(cat())
                .thing(
                    Thing::new(&["kettle", "stove"])
                        .says("look", "A dented kettle on a cold stove.")
                        .runs("use", |session, _| {
                            let diff =
                                SessionDiff::default().with_flags(map_set(&session.flags, "kettle", Some("on")));
                            let result = ActionResult::say("You set the kettle on. It starts to tick as it warms.");
                            Some(result.with_update(diff).into())
                        })
                        .alias("light", "use"),
                )
                .thing(
                    Thing::new(&["trapdoor", "trap door", "hatch"])
                        .leads("down")
                        .says("look", "A square hatch, propped open. Steps vanish into the dark.")
                        .says("open", "It's already open.")
                        .says("close", "It's stuck open."),
                )
                .phrase("climb down", VerbName::Move, Sentence::about("down")),
        )
        .room(
            Room::new("cellar", "cellar")
                .described("A damp cellar. A barrel of salted fish stands in the corner. Steps lead back up.")
                .exit("up", "kitchen")
                .ambient(move |_, _| Some(Output::say(format!("{drip} Water drips somewhere in the dark."))))
                .thing(fish())
                .thing(Thing::new(&["barrel"]).says("look", "Salted fish, packed tight.")),
        )
        .effect(
            Effect::new(LAMPLIGHT)
                .thing(Thing::new(&["flame", "light"]).says("look", "A small, steady flame."))
                .ambient(|_, _| Some(Output::say("Your lamp throws long shadows."))),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_world;

    #[test]
    fn demo_world_is_valid() {
        let errors = validate_world(&demo_world());
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn pantry_has_a_single_exit_north() {
        let world = demo_world();
        let session = Session::new("s", DEMO_WORLD, "pantry");
        let exits = world.current_room(&session).unwrap().exits_for(&session);
        assert_eq!(exits.len(), 1);
        assert_eq!(exits.get("north").map(String::as_str), Some("kitchen"));
    }
}
