//! Room definitions.
//!
//! A room is a place the player can stand: its description and exits may depend on the
//! session, individual exits can be locked by a predicate, and the things listed in it are
//! searched last (after effects and inventory) when resolving a noun.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use parley_data::{Session, Sentence, VerbName};

use crate::lookup::normalize_key;
use crate::output::{Derive, Output};
use crate::thing::Thing;
use crate::value::Value;

/// Returns a message explaining why an exit is blocked, or `None` when it is open.
pub type Lock = Arc<dyn Fn(&Session) -> Option<String> + Send + Sync>;

/// Exit directions mapped to destination room ids.
pub type Exits = BTreeMap<String, String>;

/// A canned utterance that stands for a whole action while the player is in this room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    pub utterance: String,
    pub verb: VerbName,
    pub sentence: Sentence,
}

/// Any location the player can be in.
#[derive(Clone)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub description: Value<String>,
    pub exits: Value<Exits>,
    pub locks: HashMap<String, Lock>,
    pub things: Vec<Thing>,
    /// Narration added every time the player arrives here.
    pub ambient: Option<Derive>,
    pub phrases: Vec<Phrase>,
}

impl Room {
    pub fn new(id: &str, name: &str) -> Room {
        Room {
            id: id.to_string(),
            name: name.to_string(),
            description: Value::default(),
            exits: Value::default(),
            locks: HashMap::new(),
            things: Vec::new(),
            ambient: None,
            phrases: Vec::new(),
        }
    }

    #[must_use]
    pub fn described(mut self, description: impl Into<Value<String>>) -> Room {
        self.description = description.into();
        self
    }

    /// Add a fixed exit. Has no effect once the exits are derived.
    #[must_use]
    pub fn exit(mut self, direction: &str, to: &str) -> Room {
        if let Value::Literal(exits) = &mut self.exits {
            exits.insert(direction.to_string(), to.to_string());
        }
        self
    }

    /// Replace the exits with a function of the session.
    #[must_use]
    pub fn exits_when<F>(mut self, f: F) -> Room
    where
        F: Fn(&Session) -> Exits + Send + Sync + 'static,
    {
        self.exits = Value::derived(move |session, _| f(session));
        self
    }

    #[must_use]
    pub fn locked<F>(mut self, direction: &str, lock: F) -> Room
    where
        F: Fn(&Session) -> Option<String> + Send + Sync + 'static,
    {
        self.locks.insert(direction.to_string(), Arc::new(lock));
        self
    }

    #[must_use]
    pub fn thing(mut self, thing: Thing) -> Room {
        self.things.push(thing);
        self
    }

    #[must_use]
    pub fn ambient<F>(mut self, f: F) -> Room
    where
        F: Fn(&Session, &str) -> Option<Output> + Send + Sync + 'static,
    {
        self.ambient = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn phrase(mut self, utterance: &str, verb: VerbName, sentence: Sentence) -> Room {
        self.phrases.push(Phrase {
            utterance: normalize_key(utterance),
            verb,
            sentence,
        });
        self
    }

    pub fn describe(&self, session: &Session) -> String {
        self.description.resolve(session, Some(VerbName::Look.as_str()))
    }

    pub fn exits_for(&self, session: &Session) -> Exits {
        self.exits.resolve(session, Some(VerbName::Move.as_str()))
    }

    /// The block message for `direction`, if its lock is currently shut.
    pub fn blocked(&self, direction: &str, session: &Session) -> Option<String> {
        self.locks.get(direction).and_then(|lock| lock(session))
    }

    /// The canned phrase matching an utterance, if any.
    pub fn phrase_for(&self, utterance: &str) -> Option<&Phrase> {
        let wanted = normalize_key(utterance);
        self.phrases.iter().find(|phrase| phrase.utterance == wanted)
    }
}

impl fmt::Debug for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Room")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("exits", &self.exits)
            .field("locks", &self.locks.keys().collect::<Vec<_>>())
            .field("things", &self.things)
            .field("phrases", &self.phrases)
            .finish_non_exhaustive()
    }
}
