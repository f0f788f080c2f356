//! Things: every noun the player can address.
//!
//! A [`Thing`] carries the surface words it answers to and a verb table. Each entry of the
//! table is a [`Handler`], which is one of four shapes:
//!
//! - `Literal` -- a fixed reply;
//! - `Synonym` -- "treat this verb as that other verb on the same thing";
//! - `Keyed` -- a complex phrase, keyed by the id of the *other* thing involved, with an
//!   optional `any` wildcard and an optional `self` entry for when no second thing is named;
//! - `Dynamic` -- a function of the session producing an [`Output`] tree.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parley_data::Session;
use variantly::Variantly;

use crate::lookup::normalize_key;
use crate::output::{Derive, Output};

/// Decides whether a thing can currently be seen in its room.
pub type Visibility = Arc<dyn Fn(&Session) -> bool + Send + Sync>;

/// One entry of a complex phrase.
#[derive(Clone)]
pub enum Reaction {
    Say(String),
    Run(Derive),
}

impl Reaction {
    pub fn run<F>(f: F) -> Reaction
    where
        F: Fn(&Session, &str) -> Option<Output> + Send + Sync + 'static,
    {
        Reaction::Run(Arc::new(f))
    }
}

impl From<&str> for Reaction {
    fn from(text: &str) -> Self {
        Reaction::Say(text.to_string())
    }
}

impl fmt::Debug for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reaction::Say(text) => f.debug_tuple("Say").field(text).finish(),
            Reaction::Run(_) => f.write_str("Run(..)"),
        }
    }
}

/// A complex phrase: reactions keyed by the other thing's id.
#[derive(Clone, Debug, Default)]
pub struct Keyed {
    pub by_id: HashMap<String, Reaction>,
    pub any: Option<Reaction>,
    pub on_self: Option<Reaction>,
}

impl Keyed {
    pub fn new() -> Keyed {
        Keyed::default()
    }

    /// React when the other thing has this id.
    #[must_use]
    pub fn with(mut self, id: &str, reaction: impl Into<Reaction>) -> Keyed {
        self.by_id.insert(id.to_string(), reaction.into());
        self
    }

    /// React to any other thing without a more specific entry.
    #[must_use]
    pub fn any(mut self, reaction: impl Into<Reaction>) -> Keyed {
        self.any = Some(reaction.into());
        self
    }

    /// React when the verb is used on this thing alone.
    #[must_use]
    pub fn on_self(mut self, reaction: impl Into<Reaction>) -> Keyed {
        self.on_self = Some(reaction.into());
        self
    }

    /// The reaction for a target, preferring its id over the wildcard.
    pub fn reaction_for(&self, target_id: Option<&str>) -> Option<&Reaction> {
        target_id
            .and_then(|id| self.by_id.get(id))
            .or(self.any.as_ref())
    }
}

/// What a thing does when a verb is applied to it.
#[derive(Clone, Variantly)]
pub enum Handler {
    Literal(String),
    Synonym(String),
    Keyed(Keyed),
    Dynamic(Derive),
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Handler::Synonym(verb) => f.debug_tuple("Synonym").field(verb).finish(),
            Handler::Keyed(keyed) => f.debug_tuple("Keyed").field(keyed).finish(),
            Handler::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// An addressable noun: an item, a piece of scenery, or a passage.
#[derive(Clone, Default)]
pub struct Thing {
    pub keys: Vec<String>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub visible: Option<Visibility>,
    /// Direction this thing leads, when it doubles as an exit.
    pub exit: Option<String>,
    pub verbs: HashMap<String, Handler>,
}

impl Thing {
    /// A thing answering to `keys`, which are normalized the same way player input is.
    pub fn new(keys: &[&str]) -> Thing {
        Thing {
            keys: keys.iter().map(|key| normalize_key(key)).collect(),
            ..Thing::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: &str) -> Thing {
        self.id = Some(id.to_string());
        self
    }

    #[must_use]
    pub fn named(mut self, name: &str) -> Thing {
        self.name = Some(name.to_string());
        self
    }

    #[must_use]
    pub fn visible_when<F>(mut self, predicate: F) -> Thing
    where
        F: Fn(&Session) -> bool + Send + Sync + 'static,
    {
        self.visible = Some(Arc::new(predicate));
        self
    }

    #[must_use]
    pub fn leads(mut self, direction: &str) -> Thing {
        self.exit = Some(direction.to_string());
        self
    }

    #[must_use]
    pub fn on(mut self, verb: &str, handler: Handler) -> Thing {
        self.verbs.insert(verb.to_string(), handler);
        self
    }

    #[must_use]
    pub fn says(self, verb: &str, text: &str) -> Thing {
        self.on(verb, Handler::Literal(text.to_string()))
    }

    #[must_use]
    pub fn alias(self, verb: &str, target: &str) -> Thing {
        self.on(verb, Handler::Synonym(target.to_string()))
    }

    #[must_use]
    pub fn keyed(self, verb: &str, keyed: Keyed) -> Thing {
        self.on(verb, Handler::Keyed(keyed))
    }

    #[must_use]
    pub fn runs<F>(self, verb: &str, f: F) -> Thing
    where
        F: Fn(&Session, &str) -> Option<Output> + Send + Sync + 'static,
    {
        self.on(verb, Handler::Dynamic(Arc::new(f)))
    }

    /// True if `key` (already normalized) is one of this thing's words or its id.
    pub fn matches(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key) || self.id.as_deref() == Some(key)
    }

    pub fn is_visible(&self, session: &Session) -> bool {
        self.visible.as_ref().is_none_or(|visible| visible(session))
    }

    /// How later sentences can refer back to this thing: its id, or its first key.
    pub fn reference(&self) -> String {
        self.id
            .clone()
            .or_else(|| self.keys.first().cloned())
            .unwrap_or_default()
    }

    /// The name shown to the player.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or_else(|| self.keys.first().map(String::as_str))
            .unwrap_or("thing")
    }

    pub fn handler(&self, verb: &str) -> Option<&Handler> {
        self.verbs.get(verb)
    }
}

impl fmt::Debug for Thing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thing")
            .field("keys", &self.keys)
            .field("id", &self.id)
            .field("name", &self.name)
            .field("exit", &self.exit)
            .field("verbs", &self.verbs)
            .finish_non_exhaustive()
    }
}
