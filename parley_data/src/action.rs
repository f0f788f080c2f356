//! Inbound actions and outbound results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::session::SessionDiff;

/// The closed set of verbs the engine dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerbName {
    Move,
    MoveTo,
    Inventory,
    Exits,
    Restart,
    Idle,
    Fallback,
    Attack,
    Give,
    Open,
    Close,
    Take,
    Eat,
    Talk,
    Use,
    Tie,
    Untie,
    Light,
    Look,
}

impl VerbName {
    pub const ALL: [VerbName; 19] = [
        VerbName::Move,
        VerbName::MoveTo,
        VerbName::Inventory,
        VerbName::Exits,
        VerbName::Restart,
        VerbName::Idle,
        VerbName::Fallback,
        VerbName::Attack,
        VerbName::Give,
        VerbName::Open,
        VerbName::Close,
        VerbName::Take,
        VerbName::Eat,
        VerbName::Talk,
        VerbName::Use,
        VerbName::Tie,
        VerbName::Untie,
        VerbName::Light,
        VerbName::Look,
    ];

    /// The name used on the wire and as the key into a thing's verb table.
    pub fn as_str(self) -> &'static str {
        match self {
            VerbName::Move => "move",
            VerbName::MoveTo => "moveTo",
            VerbName::Inventory => "inventory",
            VerbName::Exits => "exits",
            VerbName::Restart => "restart",
            VerbName::Idle => "idle",
            VerbName::Fallback => "fallback",
            VerbName::Attack => "attack",
            VerbName::Give => "give",
            VerbName::Open => "open",
            VerbName::Close => "close",
            VerbName::Take => "take",
            VerbName::Eat => "eat",
            VerbName::Talk => "talk",
            VerbName::Use => "use",
            VerbName::Tie => "tie",
            VerbName::Untie => "untie",
            VerbName::Light => "light",
            VerbName::Look => "look",
        }
    }
}

impl fmt::Display for VerbName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVerb(pub String);

impl fmt::Display for UnknownVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown verb '{}'", self.0)
    }
}

impl std::error::Error for UnknownVerb {}

impl FromStr for VerbName {
    type Err = UnknownVerb;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VerbName::ALL
            .into_iter()
            .find(|verb| verb.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVerb(s.to_string()))
    }
}

/// A normalized utterance: who/what the verb applies to, and optionally a second thing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    /// The verb as the player actually said it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verb: Option<String>,
}

impl Sentence {
    pub fn new() -> Sentence {
        Sentence::default()
    }

    pub fn about(subject: impl Into<String>) -> Sentence {
        Sentence {
            subject: Some(subject.into()),
            ..Sentence::default()
        }
    }

    pub fn pair(subject: impl Into<String>, object: impl Into<String>) -> Sentence {
        Sentence {
            subject: Some(subject.into()),
            object: Some(object.into()),
            verb: None,
        }
    }

    #[must_use]
    pub fn spoken_as(mut self, verb: impl Into<String>) -> Sentence {
        self.verb = Some(verb.into());
        self
    }
}

/// One request to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub session_id: String,
    #[serde(rename = "type")]
    pub kind: VerbName,
    #[serde(default)]
    pub sentence: Sentence,
}

impl Action {
    pub fn new(session_id: impl Into<String>, kind: VerbName, sentence: Sentence) -> Action {
        Action {
            session_id: session_id.into(),
            kind,
            sentence,
        }
    }
}

/// Narration plus the state change it implies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<SessionDiff>,
    /// Ends the conversation.
    #[serde(default, skip_serializing_if = "is_false")]
    pub close: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub came_from: Option<String>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

impl ActionResult {
    pub fn say(message: impl Into<String>) -> ActionResult {
        ActionResult {
            message: message.into(),
            ..ActionResult::default()
        }
    }

    /// An empty-message result that only marks what the answer is about.
    pub fn about(context: impl Into<String>) -> ActionResult {
        ActionResult {
            context: Some(context.into()),
            ..ActionResult::default()
        }
    }

    #[must_use]
    pub fn with_update(mut self, update: SessionDiff) -> Self {
        self.update = Some(update);
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn with_came_from(mut self, direction: impl Into<String>) -> Self {
        self.came_from = Some(direction.into());
        self
    }

    #[must_use]
    pub fn closing(mut self) -> Self {
        self.close = true;
        self
    }
}
