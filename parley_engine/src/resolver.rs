//! Action Resolver
//!
//! The entry point of the engine. [`Resolver::resolve_action`] takes one [`Action`], finds
//! (or creates) the player's session, runs the verb's handler, folds the output tree into a
//! single result, saves the state change and returns the finished, markup-wrapped message.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use parley_data::{Action, ActionResult, Sentence, Session, SessionDiff, VerbName};

use crate::config::EngineConfig;
use crate::markup::finalize;
use crate::output::{Output, process_output};
use crate::store::SessionStore;
use crate::verbs::{VerbHandler, VerbTable};
use crate::world::World;

/// Resolves actions against a store, one session at a time.
pub struct Resolver<S: SessionStore> {
    store: S,
    verbs: VerbTable,
    config: EngineConfig,
    idle: Option<Arc<dyn VerbHandler>>,
    session_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: SessionStore> Resolver<S> {
    pub fn new(store: S, verbs: VerbTable, config: EngineConfig) -> Resolver<S> {
        Resolver {
            store,
            verbs,
            config,
            idle: None,
            session_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Answer `idle` actions with `handler` instead of the table's default.
    #[must_use]
    pub fn with_idle_handler(mut self, handler: impl VerbHandler + 'static) -> Resolver<S> {
        self.idle = Some(Arc::new(handler));
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve one action to its final result.
    ///
    /// Actions for the same session are handled one after another; the stored session is
    /// updated at most once per action, and not at all when the engine had nothing to say.
    ///
    /// # Errors
    /// Fails only when the store does: reading or writing the session, or finding its world.
    pub fn resolve_action(&self, action: &Action) -> Result<ActionResult> {
        let lock = self.lock_for(&action.session_id);
        let resolved = {
            let _serialized = lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.resolve_locked(action)
        };
        self.release_lock(&action.session_id, lock);
        resolved
    }

    fn resolve_locked(&self, action: &Action) -> Result<ActionResult> {
        let session = self.load_session(&action.session_id)?;
        let world = self
            .store
            .get_world(&session.world_id)
            .with_context(|| format!("loading world '{}' for session '{}'", session.world_id, session.id))?;

        let (verb, sentence) = self.canned_phrase(&session, &world, action);
        info!("session '{}': {verb} {:?}", session.id, sentence);

        let resolved = self
            .dispatch(verb, &session, &world, &sentence)
            .and_then(|output| process_output(&output, &session, verb.as_str()));
        let Some(result) = resolved else {
            warn!("session '{}': nothing came of {verb} {:?}", session.id, sentence);
            return Ok(ActionResult::say(finalize(&self.config.apology, &self.config.speech_tag)));
        };

        let diff = self.persist(&session, verb, &result)?;
        Ok(ActionResult {
            message: finalize(&result.message, &self.config.speech_tag),
            update: (!diff.is_empty()).then_some(diff),
            ..result
        })
    }

    fn lock_for(&self, session_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.session_locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(session_id.to_string()).or_default())
    }

    /// Forget the lock for `session_id` unless another action holds or awaits it.
    fn release_lock(&self, session_id: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.session_locks.lock().unwrap_or_else(PoisonError::into_inner);
        // the map's copy and ours
        if Arc::strong_count(&lock) == 2 {
            locks.remove(session_id);
        }
    }

    /// The stored session, or a fresh one in the default world's start room.
    fn load_session(&self, id: &str) -> Result<Session> {
        if let Some(session) = self
            .store
            .get_session(id)
            .with_context(|| format!("reading session '{id}'"))?
        {
            return Ok(session);
        }

        let world = self
            .store
            .get_world(&self.config.default_world)
            .with_context(|| format!("loading default world '{}'", self.config.default_world))?;
        let session = Session::new(id, world.id.as_str(), world.start.as_str());
        self.store
            .write_session(&session)
            .with_context(|| format!("creating session '{id}'"))?;
        info!("new session '{id}' in world '{}' at '{}'", world.id, world.start);
        Ok(session)
    }

    /// A fallback whose words match one of the room's canned phrases becomes that phrase's action.
    fn canned_phrase(&self, session: &Session, world: &World, action: &Action) -> (VerbName, Sentence) {
        let unchanged = (action.kind, action.sentence.clone());
        if action.kind != VerbName::Fallback {
            return unchanged;
        }
        let Some(room) = world.get_room(&session.room) else {
            return unchanged;
        };

        let said = &action.sentence;
        let joined = match (&said.verb, &said.subject) {
            (Some(verb), Some(subject)) => Some(format!("{verb} {subject}")),
            _ => None,
        };
        let phrase = [joined.as_ref(), said.verb.as_ref(), said.subject.as_ref()]
            .into_iter()
            .flatten()
            .find_map(|utterance| room.phrase_for(utterance));
        match phrase {
            Some(phrase) => {
                debug!("'{}' in '{}' stands for {}", phrase.utterance, room.id, phrase.verb);
                (phrase.verb, phrase.sentence.clone())
            },
            None => unchanged,
        }
    }

    fn dispatch(&self, verb: VerbName, session: &Session, world: &World, sentence: &Sentence) -> Option<Output> {
        let handler = match (&self.idle, verb) {
            (Some(idle), VerbName::Idle) => Some(idle.as_ref()),
            _ => self.verbs.get(verb),
        };
        match handler {
            Some(handler) => handler.handle(session, world, sentence),
            None => {
                warn!("no handler registered for verb '{verb}'");
                None
            },
        }
    }

    /// Save what the result changed. Returns the diff that was applied.
    fn persist(&self, session: &Session, verb: VerbName, result: &ActionResult) -> Result<SessionDiff> {
        let mut diff = result.update.clone().unwrap_or_default();
        if diff.failures.is_none() && session.failures != 0 {
            diff.failures = Some(0);
        }
        if let Some(context) = &result.context
            && session.context.as_ref() != Some(context)
        {
            diff.context = Some(context.clone());
        }
        if let Some(came_from) = &result.came_from {
            diff.came_from = Some(came_from.clone());
        }

        if verb == VerbName::Restart {
            self.store
                .delete_session(&session.id)
                .with_context(|| format!("deleting session '{}' for restart", session.id))?;
        } else if diff.is_empty() {
            return Ok(diff);
        }

        let next = session.apply(&diff);
        self.store
            .write_session(&next)
            .with_context(|| format!("saving session '{}'", session.id))?;
        info!("session '{}' saved in '{}'", next.id, next.room);
        Ok(diff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::demo_world;
    use crate::store::MemoryStore;

    fn resolver() -> Resolver<MemoryStore> {
        let config = EngineConfig::default();
        Resolver::new(
            MemoryStore::new().with_world(demo_world()),
            VerbTable::standard(&config),
            config,
        )
    }

    fn act(resolver: &Resolver<MemoryStore>, kind: VerbName, sentence: Sentence) -> ActionResult {
        resolver.resolve_action(&Action::new("player", kind, sentence)).unwrap()
    }

    #[test]
    fn unknown_sessions_are_created_lazily() {
        let resolver = resolver();
        assert!(resolver.store().get_session("player").unwrap().is_none());
        act(&resolver, VerbName::Look, Sentence::new());
        let session = resolver.store().get_session("player").unwrap().unwrap();
        assert_eq!(session.room, "pantry");
        assert!(session.has_seen("pantry"));
    }

    #[test]
    fn messages_are_wrapped_once() {
        let resolver = resolver();
        let result = act(&resolver, VerbName::Look, Sentence::about("jars"));
        assert_eq!(
            result.message,
            "<speak>Jars of pickled everything. Nothing you'd want to eat.</speak>"
        );
    }

    #[test]
    fn context_is_remembered_for_pronouns() {
        let resolver = resolver();
        act(&resolver, VerbName::Look, Sentence::about("jars"));
        let result = act(&resolver, VerbName::Eat, Sentence::about("them"));
        assert_eq!(result.message, "<speak>You think better of it.</speak>");
    }

    #[test]
    fn apology_leaves_state_alone() {
        let config = EngineConfig::default();
        let resolver = Resolver::new(
            MemoryStore::new().with_world(demo_world()),
            VerbTable::new(),
            config,
        );
        let result = act(&resolver, VerbName::Look, Sentence::about("jars"));
        assert_eq!(result.message, "<speak>Sorry, I didn't catch that.</speak>");
        assert!(result.update.is_none());

        let session = resolver.store().get_session("player").unwrap().unwrap();
        assert_eq!(session, Session::new("player", "cottage", "pantry"));
    }

    #[test]
    fn canned_phrases_stand_in_for_fallbacks() {
        let resolver = resolver();
        let result = act(&resolver, VerbName::Fallback, Sentence::new().spoken_as("leave"));
        assert_eq!(result.update.unwrap().room.as_deref(), Some("kitchen"));
        let session = resolver.store().get_session("player").unwrap().unwrap();
        assert_eq!(session.flag("tries"), None);
    }

    #[test]
    fn custom_idle_handler_wins() {
        let resolver = resolver().with_idle_handler(|_: &Session, _: &World, _: &Sentence| Some(Output::say("Psst.")));
        assert_eq!(act(&resolver, VerbName::Idle, Sentence::new()).message, "<speak>Psst.</speak>");
    }

    fn lock_count(resolver: &Resolver<MemoryStore>) -> usize {
        resolver.session_locks.lock().unwrap().len()
    }

    #[test]
    fn finished_sessions_leave_no_locks_behind() {
        let resolver = resolver();
        for n in 0..50 {
            let id = format!("visitor-{n}");
            resolver
                .resolve_action(&Action::new(id.as_str(), VerbName::Look, Sentence::new()))
                .unwrap();
            resolver.store().delete_session(&id).unwrap();
        }
        assert_eq!(lock_count(&resolver), 0);
    }

    #[test]
    fn concurrent_actions_on_one_session_are_not_lost() {
        const THREADS: u32 = 8;
        const ROUNDS: u32 = 3;
        let resolver = resolver();
        std::thread::scope(|scope| {
            for _ in 0..THREADS {
                scope.spawn(|| {
                    for _ in 0..ROUNDS {
                        act(&resolver, VerbName::Fallback, Sentence::new());
                    }
                });
            }
        });

        let session = resolver.store().get_session("player").unwrap().unwrap();
        assert_eq!(session.failures, THREADS * ROUNDS);
        assert_eq!(session.flag("tries"), Some("3"));
        assert_eq!(lock_count(&resolver), 0);
    }

    #[test]
    fn success_resets_failures() {
        let resolver = resolver();
        act(&resolver, VerbName::Fallback, Sentence::new());
        assert_eq!(resolver.store().get_session("player").unwrap().unwrap().failures, 1);
        act(&resolver, VerbName::Look, Sentence::about("lamp"));
        assert_eq!(resolver.store().get_session("player").unwrap().unwrap().failures, 0);
    }
}
