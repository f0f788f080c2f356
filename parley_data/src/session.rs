//! Per-player session state and the shallow diffs that replace it.
//!
//! All collections are persistent (`im`) values. A handler never edits a session; it
//! describes the fields it wants replaced in a [`SessionDiff`], and the engine builds the
//! next session with [`Session::apply`].

use im::{OrdMap, OrdSet};
use serde::{Deserialize, Serialize};

/// Arbitrary puzzle state, keyed by flag name.
pub type Flags = OrdMap<String, String>;
/// A set of thing, room or effect ids.
pub type IdSet = OrdSet<String>;

/// Everything the engine remembers about one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub world_id: String,
    pub room: String,
    #[serde(default)]
    pub flags: Flags,
    #[serde(default)]
    pub inventory: IdSet,
    #[serde(default)]
    pub gone: IdSet,
    #[serde(default)]
    pub seen: IdSet,
    #[serde(default)]
    pub effects: IdSet,
    #[serde(default)]
    pub failures: u32,
    /// The thing the last answer was about; pronouns in the next sentence resolve to it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Direction that leads back to the previous room.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub came_from: Option<String>,
}

impl Session {
    /// Create a fresh session standing in `start_room` of `world_id`.
    pub fn new(id: impl Into<String>, world_id: impl Into<String>, start_room: impl Into<String>) -> Session {
        let room = start_room.into();
        Session {
            id: id.into(),
            world_id: world_id.into(),
            seen: OrdSet::unit(room.clone()),
            room,
            flags: Flags::new(),
            inventory: IdSet::new(),
            gone: IdSet::new(),
            effects: IdSet::new(),
            failures: 0,
            context: None,
            came_from: None,
        }
    }

    /// Build the session that results from replacing every field present in `diff`.
    ///
    /// Replacement is shallow: a diff carrying `flags` swaps the whole flag map.
    /// An empty `context` or `came_from` clears that field.
    pub fn apply(&self, diff: &SessionDiff) -> Session {
        let mut next = self.clone();
        if let Some(room) = &diff.room {
            next.room.clone_from(room);
        }
        if let Some(flags) = &diff.flags {
            next.flags = flags.clone();
        }
        if let Some(inventory) = &diff.inventory {
            next.inventory = inventory.clone();
        }
        if let Some(gone) = &diff.gone {
            next.gone = gone.clone();
        }
        if let Some(seen) = &diff.seen {
            next.seen = seen.clone();
        }
        if let Some(effects) = &diff.effects {
            next.effects = effects.clone();
        }
        if let Some(failures) = diff.failures {
            next.failures = failures;
        }
        if let Some(context) = &diff.context {
            next.context = non_empty(context);
        }
        if let Some(came_from) = &diff.came_from {
            next.came_from = non_empty(came_from);
        }
        next
    }

    /// Current value of a flag, if set.
    pub fn flag(&self, name: &str) -> Option<&str> {
        self.flags.get(name).map(String::as_str)
    }

    /// True if the player carries the thing with this id.
    pub fn carries(&self, id: &str) -> bool {
        self.inventory.contains(id)
    }

    /// True if the thing with this id was removed from its room.
    pub fn is_gone(&self, id: &str) -> bool {
        self.gone.contains(id)
    }

    /// True if the room with this id was visited.
    pub fn has_seen(&self, room_id: &str) -> bool {
        self.seen.contains(room_id)
    }

    /// True if the effect with this id is active.
    pub fn has_effect(&self, effect_id: &str) -> bool {
        self.effects.contains(effect_id)
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// A partial session: each present field replaces the session's field wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDiff {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<Flags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<IdSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gone: Option<IdSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seen: Option<IdSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<IdSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failures: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub came_from: Option<String>,
}

impl SessionDiff {
    /// A diff that puts everything except id and world back to a fresh start in `start_room`.
    pub fn restart(start_room: &str) -> SessionDiff {
        SessionDiff {
            room: Some(start_room.to_string()),
            flags: Some(Flags::new()),
            inventory: Some(IdSet::new()),
            gone: Some(IdSet::new()),
            seen: Some(OrdSet::unit(start_room.to_string())),
            effects: Some(IdSet::new()),
            failures: Some(0),
            context: Some(String::new()),
            came_from: Some(String::new()),
        }
    }

    /// True when applying this diff would change nothing.
    pub fn is_empty(&self) -> bool {
        self == &SessionDiff::default()
    }

    /// Combine with a later diff. Fields the later diff carries replace ours entirely.
    #[must_use]
    pub fn merge(&self, later: &SessionDiff) -> SessionDiff {
        SessionDiff {
            room: later.room.clone().or_else(|| self.room.clone()),
            flags: later.flags.clone().or_else(|| self.flags.clone()),
            inventory: later.inventory.clone().or_else(|| self.inventory.clone()),
            gone: later.gone.clone().or_else(|| self.gone.clone()),
            seen: later.seen.clone().or_else(|| self.seen.clone()),
            effects: later.effects.clone().or_else(|| self.effects.clone()),
            failures: later.failures.or(self.failures),
            context: later.context.clone().or_else(|| self.context.clone()),
            came_from: later.came_from.clone().or_else(|| self.came_from.clone()),
        }
    }

    #[must_use]
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = Some(flags);
        self
    }

    #[must_use]
    pub fn with_inventory(mut self, inventory: IdSet) -> Self {
        self.inventory = Some(inventory);
        self
    }

    #[must_use]
    pub fn with_gone(mut self, gone: IdSet) -> Self {
        self.gone = Some(gone);
        self
    }

    #[must_use]
    pub fn with_seen(mut self, seen: IdSet) -> Self {
        self.seen = Some(seen);
        self
    }

    #[must_use]
    pub fn with_effects(mut self, effects: IdSet) -> Self {
        self.effects = Some(effects);
        self
    }

    #[must_use]
    pub fn with_failures(mut self, failures: u32) -> Self {
        self.failures = Some(failures);
        self
    }

    #[must_use]
    pub fn with_came_from(mut self, direction: impl Into<String>) -> Self {
        self.came_from = Some(direction.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_has_seen_its_start_room() {
        let session = Session::new("s1", "cottage", "pantry");
        assert!(session.has_seen("pantry"));
        assert_eq!(session.seen.len(), 1);
        assert_eq!(session.failures, 0);
    }

    #[test]
    fn apply_replaces_present_fields_only() {
        let mut session = Session::new("s1", "cottage", "pantry");
        session.flags.insert("lamp".into(), "lit".into());
        let diff = SessionDiff::default()
            .with_room("kitchen")
            .with_inventory(OrdSet::unit("key".to_string()));

        let next = session.apply(&diff);
        assert_eq!(next.room, "kitchen");
        assert!(next.carries("key"));
        assert_eq!(next.flag("lamp"), Some("lit"));
        // the original value is untouched
        assert_eq!(session.room, "pantry");
        assert!(!session.carries("key"));
    }

    #[test]
    fn apply_replaces_flag_map_wholesale() {
        let mut session = Session::new("s1", "cottage", "pantry");
        session.flags.insert("a".into(), "1".into());
        let diff = SessionDiff::default().with_flags(OrdMap::unit("b".to_string(), "2".to_string()));

        let next = session.apply(&diff);
        assert_eq!(next.flag("a"), None);
        assert_eq!(next.flag("b"), Some("2"));
    }

    #[test]
    fn empty_context_clears_it() {
        let session = Session::new("s1", "cottage", "pantry").apply(&SessionDiff::default().with_context("lamp"));
        assert_eq!(session.context.as_deref(), Some("lamp"));
        let cleared = session.apply(&SessionDiff::default().with_context(""));
        assert_eq!(cleared.context, None);
    }

    #[test]
    fn merge_prefers_later_fields() {
        let earlier = SessionDiff::default().with_room("kitchen").with_failures(2);
        let later = SessionDiff::default().with_room("cellar");
        let merged = earlier.merge(&later);
        assert_eq!(merged.room.as_deref(), Some("cellar"));
        assert_eq!(merged.failures, Some(2));
    }

    #[test]
    fn restart_diff_resets_everything() {
        let mut session = Session::new("s1", "cottage", "cellar");
        session.inventory.insert("key".into());
        session.effects.insert("cursed".into());
        session.failures = 4;
        session.came_from = Some("up".into());

        let fresh = session.apply(&SessionDiff::restart("pantry"));
        assert_eq!(fresh, Session::new("s1", "cottage", "pantry"));
    }

    #[test]
    fn diff_json_skips_absent_fields() {
        let diff = SessionDiff::default().with_room("kitchen").with_came_from("south");
        let json = serde_json::to_string(&diff).unwrap();
        assert_eq!(json, r#"{"room":"kitchen","cameFrom":"south"}"#);
        assert!(SessionDiff::default().is_empty());
    }
}
