//! `verbs::system` module
//!
//! Verbs about the conversation itself rather than the world: starting over, nudging a
//! silent player, and coping with sentences nobody understood.

use log::info;
use parley_data::{ActionResult, Sentence, Session, SessionDiff};

use crate::config::FallbackMessages;
use crate::immutable::map_set;
use crate::output::Output;
use crate::value::{Value, pick};
use crate::verbs::VerbHandler;
use crate::world::World;

/// Flag counting consecutive misunderstandings.
pub const TRIES_FLAG: &str = "tries";

/// Misunderstandings after which the hint is given every time.
pub const MAX_TRIES: u32 = 3;

/// The `restart` verb: everything back to the world's start room.
pub struct Restart;

impl VerbHandler for Restart {
    fn handle(&self, session: &Session, world: &World, _sentence: &Sentence) -> Option<Output> {
        let diff = SessionDiff::restart(&world.start);
        let fresh = session.apply(&diff);
        let start = world.current_room(&fresh)?;
        info!("session '{}' restarts in '{}'", session.id, world.start);
        Some(Output::Leaf(ActionResult::say(start.describe(&fresh)).with_update(diff)))
    }
}

/// The default `idle` verb: asks whether anybody is still there.
pub struct Idle {
    pub prompt: Value<String>,
}

impl Default for Idle {
    fn default() -> Self {
        Self {
            prompt: pick(&[
                "Are you still there?",
                "Hello? Where did you go?",
                "Take your time. I'll wait.",
                "Still thinking it over?",
            ]),
        }
    }
}

impl VerbHandler for Idle {
    fn handle(&self, session: &Session, _world: &World, _sentence: &Sentence) -> Option<Output> {
        Some(Output::say(self.prompt.resolve(session, Some("idle"))))
    }
}

/// The `fallback` verb, for sentences the intent extractor could not place.
///
/// Each call counts one more failure and one more try, up to [`MAX_TRIES`]. The first two
/// tries get the confused message, the third the lost one, and from then on the hint.
pub struct Fallback {
    pub messages: FallbackMessages,
}

impl Fallback {
    pub fn new(messages: FallbackMessages) -> Fallback {
        Fallback { messages }
    }
}

impl VerbHandler for Fallback {
    fn handle(&self, session: &Session, _world: &World, _sentence: &Sentence) -> Option<Output> {
        let tries = session
            .flag(TRIES_FLAG)
            .and_then(|tries| tries.parse::<u32>().ok())
            .unwrap_or(0);
        let message = match tries {
            0 | 1 => &self.messages.confused,
            2 => &self.messages.lost,
            _ => &self.messages.hint,
        };
        let next = (tries + 1).min(MAX_TRIES).to_string();
        let diff = SessionDiff::default()
            .with_flags(map_set(&session.flags, TRIES_FLAG, Some(next.as_str())))
            .with_failures(session.failures.saturating_add(1));
        Some(Output::Leaf(ActionResult::say(message.as_str()).with_update(diff)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::process_output;
    use crate::room::Room;

    fn world() -> World {
        World::new("w", "porch").room(Room::new("porch", "porch").described("A creaky porch."))
    }

    #[test]
    fn fallback_escalates_and_caps() {
        let world = world();
        let fallback = Fallback::new(FallbackMessages::default());
        let mut session = Session::new("s", "w", "porch");
        let expected = [
            ("You can't do that", "1"),
            ("You can't do that", "2"),
            ("I don't understand that", "3"),
            ("Try simple sentences with verbs like move, take, look, talk, and use.", "3"),
        ];
        for (failures, (message, tries)) in (1..).zip(expected) {
            let output = fallback.handle(&session, &world, &Sentence::new()).unwrap();
            let result = process_output(&output, &session, "fallback").unwrap();
            assert_eq!(result.message, message);
            session = session.apply(&result.update.unwrap());
            assert_eq!(session.flag(TRIES_FLAG), Some(tries));
            assert_eq!(session.failures, failures);
        }
    }

    #[test]
    fn restart_resets_everything() {
        let world = world();
        let mut session = Session::new("s", "w", "cellar");
        session.inventory.insert("lamp".into());
        session.flags.insert("tries".into(), "2".into());

        let output = Restart.handle(&session, &world, &Sentence::new()).unwrap();
        let result = process_output(&output, &session, "restart").unwrap();
        assert_eq!(result.message, "A creaky porch.");

        let fresh = session.apply(&result.update.unwrap());
        assert_eq!(fresh.room, "porch");
        assert!(fresh.inventory.is_empty() && fresh.flags.is_empty());
        assert_eq!(fresh.seen.len(), 1);
    }

    #[test]
    fn idle_asks_something() {
        let session = Session::new("s", "w", "porch");
        let output = Idle::default().handle(&session, &world(), &Sentence::new()).unwrap();
        let result = process_output(&output, &session, "idle").unwrap();
        assert!(!result.message.is_empty());
        assert!(result.update.is_none());
    }
}
