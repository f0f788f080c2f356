//! The shared, read-only game world.
//!
//! A [`World`] holds every room, item and effect of one adventure. It is built once, checked
//! with [`crate::validate::ensure_valid`], wrapped in an `Arc` and shared by every session
//! that plays it. Nothing in the engine mutates a world after it is built.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use parley_data::Session;

use crate::output::{Derive, Output};
use crate::room::Room;
use crate::thing::Thing;

/// A global status that follows the player from room to room.
///
/// While active, its things are addressable everywhere (and are searched before anything
/// else), and its ambient narration is added whenever the player enters a room.
#[derive(Clone)]
pub struct Effect {
    pub id: String,
    pub things: Vec<Thing>,
    pub ambient: Option<Derive>,
}

impl Effect {
    pub fn new(id: &str) -> Effect {
        Effect {
            id: id.to_string(),
            things: Vec::new(),
            ambient: None,
        }
    }

    #[must_use]
    pub fn thing(mut self, thing: Thing) -> Effect {
        self.things.push(thing);
        self
    }

    #[must_use]
    pub fn ambient<F>(mut self, f: F) -> Effect
    where
        F: Fn(&Session, &str) -> Option<Output> + Send + Sync + 'static,
    {
        self.ambient = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("id", &self.id)
            .field("things", &self.things)
            .field("ambient", &self.ambient.is_some())
            .finish()
    }
}

/// Complete reference data for one adventure.
#[derive(Clone, Debug)]
pub struct World {
    pub id: String,
    pub start: String,
    pub rooms: HashMap<String, Room>,
    pub items: HashMap<String, Thing>,
    pub effects: HashMap<String, Effect>,
    /// Sound name to audio URL.
    pub sounds: HashMap<String, String>,
    pub credits: String,
}

impl World {
    pub fn new(id: &str, start: &str) -> World {
        debug!("new world '{id}' starting in '{start}'");
        World {
            id: id.to_string(),
            start: start.to_string(),
            rooms: HashMap::new(),
            items: HashMap::new(),
            effects: HashMap::new(),
            sounds: HashMap::new(),
            credits: String::new(),
        }
    }

    /// Add a room. Its things that have ids are indexed as items too, so they stay
    /// reachable from the inventory once taken.
    #[must_use]
    pub fn room(mut self, room: Room) -> World {
        for thing in &room.things {
            if let Some(id) = &thing.id {
                self.items.entry(id.clone()).or_insert_with(|| thing.clone());
            }
        }
        self.rooms.insert(room.id.clone(), room);
        self
    }

    /// Add an item that starts outside any room (in a starting inventory, or handed over
    /// later by a handler). Items must have an id.
    #[must_use]
    pub fn item(mut self, thing: Thing) -> World {
        match thing.id.clone() {
            Some(id) => {
                self.items.insert(id, thing);
            },
            None => warn!("world '{}': ignoring item {:?} without an id", self.id, thing.keys),
        }
        self
    }

    #[must_use]
    pub fn effect(mut self, effect: Effect) -> World {
        self.effects.insert(effect.id.clone(), effect);
        self
    }

    #[must_use]
    pub fn sound(mut self, name: &str, url: &str) -> World {
        self.sounds.insert(name.to_string(), url.to_string());
        self
    }

    #[must_use]
    pub fn credits(mut self, text: &str) -> World {
        self.credits = text.to_string();
        self
    }

    pub fn get_room(&self, id: &str) -> Option<&Room> {
        self.rooms.get(id)
    }

    /// The room the session is standing in.
    pub fn current_room(&self, session: &Session) -> Option<&Room> {
        let room = self.rooms.get(&session.room);
        if room.is_none() {
            warn!("session '{}' is in unknown room '{}'", session.id, session.room);
        }
        room
    }

    pub fn get_item(&self, id: &str) -> Option<&Thing> {
        self.items.get(id)
    }

    /// Speech markup playing the named sound, or an empty string if the world has no such sound.
    pub fn play(&self, name: &str) -> String {
        match self.sounds.get(name) {
            Some(url) => format!("<audio src=\"{url}\"/>"),
            None => {
                warn!("world '{}' has no sound named '{name}'", self.id);
                String::new()
            },
        }
    }
}
