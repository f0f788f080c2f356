//! Verb Interaction Engine
//!
//! An [`Interaction`] resolves one verb against the things a sentence names. A sentence with
//! only a subject ("eat the apple") takes the simple path: the first candidate whose verb
//! table can handle the verb on its own answers. A sentence with an object as well ("tie the
//! rope to the hook") takes the complex path: every subject/object pair is tried, subject
//! first, against the keyed phrases of both things.

use std::sync::Arc;

use log::{debug, warn};
use parley_data::{ActionResult, Sentence, Session, VerbName};

use crate::lookup::{find_candidates, normalize_key};
use crate::output::Output;
use crate::thing::{Handler, Reaction, Thing};
use crate::verbs::VerbHandler;
use crate::verbs::movement::go;
use crate::world::World;

/// Synonyms may chain, but never further than this.
pub const MAX_REDIRECTS: usize = 8;

/// Words that refer back to the thing the last answer was about.
const PRONOUNS: [&str; 5] = ["it", "that", "them", "him", "her"];

/// Verb-specific handling for subjects that match no thing. Receives the subject word,
/// which is empty when the sentence had none.
pub type CustomFallback = Arc<dyn Fn(&Session, &World, &str) -> Option<Output> + Send + Sync>;

/// A generic verb built on thing verb tables.
#[derive(Clone)]
pub struct Interaction {
    pub verb: VerbName,
    /// Used when no candidate can take the verb. `{verb}` and `{subject}` are filled in.
    pub failure: String,
    /// Used when no pair of things works together. `{verb}`, `{subject}`, `{object}`.
    pub complex_failure: String,
    /// Used when a word matches nothing. `{verb}`, `{subject}`.
    pub missing: String,
    pub fallback: Option<CustomFallback>,
    /// Things that double as exits may be walked through with this verb.
    pub exits: bool,
}

impl Interaction {
    pub fn new(verb: VerbName) -> Interaction {
        Interaction {
            verb,
            failure: "You can't {verb} the {subject}.".to_string(),
            complex_failure: "You can't {verb} those together.".to_string(),
            missing: "There is no {subject} here.".to_string(),
            fallback: None,
            exits: false,
        }
    }

    #[must_use]
    pub fn failing(mut self, template: &str) -> Interaction {
        self.failure = template.to_string();
        self
    }

    #[must_use]
    pub fn failing_together(mut self, template: &str) -> Interaction {
        self.complex_failure = template.to_string();
        self
    }

    #[must_use]
    pub fn missing(mut self, template: &str) -> Interaction {
        self.missing = template.to_string();
        self
    }

    #[must_use]
    pub fn fallback<F>(mut self, f: F) -> Interaction
    where
        F: Fn(&Session, &World, &str) -> Option<Output> + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_exits(mut self) -> Interaction {
        self.exits = true;
        self
    }

    fn fill(&self, template: &str, subject: &str, object: &str) -> String {
        template
            .replace("{verb}", self.verb.as_str())
            .replace("{subject}", subject)
            .replace("{object}", object)
    }

    fn custom(&self, session: &Session, world: &World, subject: &str) -> Option<Output> {
        self.fallback.as_ref().and_then(|fallback| fallback(session, world, subject))
    }

    /// `verb(subject)`.
    pub fn simple(&self, session: &Session, world: &World, subject: &str) -> Output {
        self.simple_word(session, world, &Word::said(subject))
    }

    fn simple_word(&self, session: &Session, world: &World, subject: &Word) -> Output {
        let candidates = find_candidates(session, world, &subject.key);
        if candidates.is_empty() {
            return self
                .custom(session, world, &subject.key)
                .unwrap_or_else(|| Output::say(self.fill(&self.missing, &subject.key, "")));
        }

        for thing in &candidates {
            if let Some(output) = self.apply_alone(session, world, thing, self.verb.as_str(), 0) {
                return output;
            }
        }

        Output::say(self.fill(&self.failure, &subject.name(candidates[0]), ""))
    }

    fn apply_alone(&self, session: &Session, world: &World, thing: &Thing, verb: &str, depth: usize) -> Option<Output> {
        match thing.handler(verb) {
            Some(Handler::Synonym(next)) => {
                if depth >= MAX_REDIRECTS {
                    warn!("'{}': synonym chain from '{verb}' is too long", thing.reference());
                    return None;
                }
                debug!("'{}': '{verb}' redirects to '{next}'", thing.reference());
                self.apply_alone(session, world, thing, next, depth + 1)
            },
            Some(Handler::Literal(text)) => Some(literal(text, thing)),
            Some(Handler::Keyed(keyed)) => match &keyed.on_self {
                Some(Reaction::Say(text)) => Some(literal(text, thing)),
                Some(Reaction::Run(derive)) => {
                    Some(Output::about(thing.reference()).then(Output::Derived(derive.clone())))
                },
                None => None,
            },
            Some(Handler::Dynamic(derive)) => {
                Some(Output::about(thing.reference()).then(Output::Derived(derive.clone())))
            },
            None => match &thing.exit {
                Some(direction) if self.exits => Some(go(session, world, direction)),
                _ => None,
            },
        }
    }

    /// `verb(subject, object)`.
    pub fn complex(&self, session: &Session, world: &World, subject: &str, object: &str) -> Output {
        self.complex_words(session, world, &Word::said(subject), &Word::said(object))
    }

    fn complex_words(&self, session: &Session, world: &World, subject: &Word, object: &Word) -> Output {
        let subjects = find_candidates(session, world, &subject.key);
        if subjects.is_empty() {
            return Output::say(self.fill(&self.missing, &subject.key, ""));
        }
        let objects = find_candidates(session, world, &object.key);
        if objects.is_empty() {
            return Output::say(self.fill(&self.missing, &object.key, ""));
        }

        let verb = self.verb.as_str();
        let appliers = subjects
            .iter()
            .filter(|thing| thing.id.is_some() || thing.handler(verb).is_some_and(Handler::is_keyed));
        for actor in appliers {
            for target in &objects {
                let applied = try_apply(verb, actor, target, 0).or_else(|| try_apply(verb, target, actor, 0));
                if let Some(output) = applied {
                    return output;
                }
            }
        }

        Output::say(self.fill(
            &self.complex_failure,
            &subject.name(subjects[0]),
            &object.name(objects[0]),
        ))
    }
}

/// Apply `actor`'s keyed phrase for `verb` to `target`.
pub fn try_apply(verb: &str, actor: &Thing, target: &Thing, depth: usize) -> Option<Output> {
    match actor.handler(verb)? {
        Handler::Synonym(next) => {
            if depth >= MAX_REDIRECTS {
                warn!("'{}': synonym chain from '{verb}' is too long", actor.reference());
                return None;
            }
            try_apply(next, actor, target, depth + 1)
        },
        Handler::Keyed(keyed) => match keyed.reaction_for(target.id.as_deref())? {
            Reaction::Say(text) => Some(Output::say(text.clone())),
            Reaction::Run(derive) => Some(Output::Derived(derive.clone())),
        },
        Handler::Literal(_) | Handler::Dynamic(_) => None,
    }
}

fn literal(text: &str, thing: &Thing) -> Output {
    ActionResult::say(text).with_context(thing.reference()).into()
}

/// A word of the sentence after pronoun resolution.
struct Word {
    key: String,
    pronoun: bool,
}

impl Word {
    fn said(raw: &str) -> Word {
        Word {
            key: normalize_key(raw),
            pronoun: false,
        }
    }

    fn read(session: &Session, raw: &str) -> Word {
        let said = normalize_key(raw);
        let key = resolve_pronoun(session, &said);
        Word {
            pronoun: key != said,
            key,
        }
    }

    /// How a failure message names the word: as said, or by the thing a pronoun stood for.
    fn name(&self, first: &Thing) -> String {
        match first.keys.first() {
            Some(known) if self.pronoun => known.clone(),
            _ => self.key.clone(),
        }
    }
}

/// Replace a pronoun with the thing the last answer was about.
pub fn resolve_pronoun(session: &Session, word: &str) -> String {
    let key = normalize_key(word);
    match &session.context {
        Some(context) if PRONOUNS.contains(&key.as_str()) => {
            debug!("'{key}' refers to '{context}'");
            context.clone()
        },
        _ => key,
    }
}

impl VerbHandler for Interaction {
    fn handle(&self, session: &Session, world: &World, sentence: &Sentence) -> Option<Output> {
        let subject = sentence
            .subject
            .as_deref()
            .map(|word| Word::read(session, word))
            .filter(|word| !word.key.is_empty());
        let object = sentence
            .object
            .as_deref()
            .map(|word| Word::read(session, word))
            .filter(|word| !word.key.is_empty());

        match (subject, object) {
            (Some(subject), Some(object)) => Some(self.complex_words(session, world, &subject, &object)),
            (Some(word), None) | (None, Some(word)) => Some(self.simple_word(session, world, &word)),
            (None, None) => self
                .custom(session, world, "")
                .or_else(|| Some(Output::say(format!("What do you want to {}?", self.verb)))),
        }
    }
}
