//! Consistency checks for hand-built worlds.
//!
//! Worlds are ordinary Rust values, so nothing stops an author from pointing an exit at a
//! room that does not exist or keying a phrase by a misspelled id. [`validate_world`] finds
//! what can be checked without a session (derived exits and descriptions are opaque), and
//! [`ensure_valid`] turns the findings into a single error.

use std::collections::HashSet;
use std::fmt;

use anyhow::{Result, bail};
use log::info;
use parley_data::VerbName;

use crate::room::Room;
use crate::thing::{Handler, Thing};
use crate::value::Value;
use crate::world::World;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateId { kind: &'static str, id: String },
    MissingReference { kind: &'static str, id: String, context: String },
    InvalidValue { context: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateId { kind, id } => {
                write!(f, "duplicate {kind} id '{id}'")
            },
            ValidationError::MissingReference { kind, id, context } => {
                write!(f, "missing {kind} '{id}' ({context})")
            },
            ValidationError::InvalidValue { context } => {
                write!(f, "invalid value ({context})")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Everything wrong with `world` that can be seen without playing it.
pub fn validate_world(world: &World) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if world.get_room(&world.start).is_none() {
        errors.push(ValidationError::MissingReference {
            kind: "room",
            id: world.start.clone(),
            context: format!("start of world '{}'", world.id),
        });
    }

    // every id a keyed phrase may name
    let mut known = world.items.keys().cloned().collect::<HashSet<_>>();
    let mut room_thing_ids = HashSet::new();
    let mut rooms = world.rooms.values().collect::<Vec<_>>();
    rooms.sort_by(|a, b| a.id.cmp(&b.id));
    for room in &rooms {
        for id in room.things.iter().filter_map(|thing| thing.id.as_deref()) {
            if !room_thing_ids.insert(id) {
                errors.push(ValidationError::DuplicateId {
                    kind: "thing",
                    id: id.to_string(),
                });
            }
        }
    }
    for effect in world.effects.values() {
        known.extend(effect.things.iter().filter_map(|thing| thing.id.clone()));
    }

    for room in &rooms {
        check_room(world, room, &known, &mut errors);
    }

    let mut items = world.items.values().collect::<Vec<_>>();
    items.sort_by_key(|thing| thing.reference());
    for item in items {
        check_thing(item, &format!("item '{}'", item.reference()), &known, &mut errors);
    }
    for effect in world.effects.values() {
        for thing in &effect.things {
            check_thing(thing, &format!("effect '{}'", effect.id), &known, &mut errors);
        }
    }

    errors
}

fn check_room(world: &World, room: &Room, known: &HashSet<String>, errors: &mut Vec<ValidationError>) {
    let literal_exits = match &room.exits {
        Value::Literal(exits) => Some(exits),
        Value::Derived(_) => None,
    };

    if let Some(exits) = literal_exits {
        for (direction, target) in exits {
            if world.get_room(target).is_none() {
                errors.push(ValidationError::MissingReference {
                    kind: "room",
                    id: target.clone(),
                    context: format!("exit {direction} of room '{}'", room.id),
                });
            }
        }
        let mut locked = room.locks.keys().collect::<Vec<_>>();
        locked.sort();
        for direction in locked {
            if !exits.contains_key(direction) {
                errors.push(ValidationError::InvalidValue {
                    context: format!("room '{}' locks {direction}, which is not an exit", room.id),
                });
            }
        }
    }

    for thing in &room.things {
        let context = format!("room '{}' thing '{}'", room.id, thing.reference());
        if let (Some(direction), Some(exits)) = (&thing.exit, literal_exits)
            && !exits.contains_key(direction)
        {
            errors.push(ValidationError::InvalidValue {
                context: format!("{context} leads {direction}, which is not an exit"),
            });
        }
        check_thing(thing, &context, known, errors);
    }

    for phrase in &room.phrases {
        if phrase.verb == VerbName::Fallback {
            errors.push(ValidationError::InvalidValue {
                context: format!("room '{}' phrase '{}' maps to fallback", room.id, phrase.utterance),
            });
        }
    }
}

fn check_thing(thing: &Thing, context: &str, known: &HashSet<String>, errors: &mut Vec<ValidationError>) {
    if thing.keys.iter().all(String::is_empty) {
        errors.push(ValidationError::InvalidValue {
            context: format!("{context} has no words to be called by"),
        });
    }

    let mut verbs = thing.verbs.iter().collect::<Vec<_>>();
    verbs.sort_by(|a, b| a.0.cmp(b.0));
    for (verb, handler) in verbs {
        match handler {
            Handler::Synonym(target) if !thing.verbs.contains_key(target) => {
                errors.push(ValidationError::MissingReference {
                    kind: "verb",
                    id: target.clone(),
                    context: format!("{context} redirects '{verb}'"),
                });
            },
            Handler::Keyed(keyed) => {
                let mut ids = keyed.by_id.keys().collect::<Vec<_>>();
                ids.sort();
                for id in ids.into_iter().filter(|id| !known.contains(*id)) {
                    errors.push(ValidationError::MissingReference {
                        kind: "thing",
                        id: id.clone(),
                        context: format!("{context} '{verb}' phrase"),
                    });
                }
            },
            _ => {},
        }
    }
}

/// Fail with every validation error listed, or log that the world is sound.
///
/// # Errors
/// Returns an error naming each problem [`validate_world`] found.
pub fn ensure_valid(world: &World) -> Result<()> {
    let errors = validate_world(world);
    if errors.is_empty() {
        info!("world '{}' validated: {} rooms, {} items", world.id, world.rooms.len(), world.items.len());
        return Ok(());
    }
    let listing = errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
    bail!("world '{}' has {} problem(s): {listing}", world.id, errors.len())
}
