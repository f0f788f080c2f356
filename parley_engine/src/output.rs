//! Output trees and the merge engine that reduces them to a single [`ActionResult`].
//!
//! Handlers do not return a finished answer. They return an [`Output`] tree whose leaves are
//! results, whose inner nodes are sequences, and whose `Derived` nodes are functions of the
//! session evaluated only when the fold reaches them. [`process_output`] walks the tree left
//! to right:
//!
//! - each step sees the session as left by the steps before it (their updates applied);
//! - messages are joined with single spaces, updates are combined field by field;
//! - the first step that leaves the merged result closed ends the walk, and nothing after
//!   it is evaluated.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use parley_data::{ActionResult, Session};

/// A session-dependent part of an output tree. Receives the working session and the verb.
pub type Derive = Arc<dyn Fn(&Session, &str) -> Option<Output> + Send + Sync>;

/// A node of an output tree.
#[derive(Clone)]
pub enum Output {
    Leaf(ActionResult),
    Derived(Derive),
    Sequence(Vec<Output>),
}

impl Output {
    /// A plain message leaf.
    pub fn say(message: impl Into<String>) -> Output {
        Output::Leaf(ActionResult::say(message))
    }

    /// An empty-message leaf that sets the context for pronouns.
    pub fn about(reference: impl Into<String>) -> Output {
        Output::Leaf(ActionResult::about(reference))
    }

    pub fn derived<F>(f: F) -> Output
    where
        F: Fn(&Session, &str) -> Option<Output> + Send + Sync + 'static,
    {
        Output::Derived(Arc::new(f))
    }

    /// Append `next` after this node, flattening into one sequence.
    #[must_use]
    pub fn then(self, next: impl Into<Output>) -> Output {
        let next = next.into();
        match self {
            Output::Sequence(mut items) => {
                items.push(next);
                Output::Sequence(items)
            },
            other => Output::Sequence(vec![other, next]),
        }
    }
}

impl From<ActionResult> for Output {
    fn from(result: ActionResult) -> Self {
        Output::Leaf(result)
    }
}

impl From<Vec<Output>> for Output {
    fn from(items: Vec<Output>) -> Self {
        Output::Sequence(items)
    }
}

impl From<Derive> for Output {
    fn from(derive: Derive) -> Self {
        Output::Derived(derive)
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Leaf(result) => f.debug_tuple("Leaf").field(result).finish(),
            Output::Derived(_) => f.write_str("Derived(..)"),
            Output::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
        }
    }
}

/// Reduce an output tree to one result, or `None` when nothing in it produced a result.
pub fn process_output(node: &Output, session: &Session, verb: &str) -> Option<ActionResult> {
    match node {
        Output::Leaf(result) => Some(result.clone()),
        Output::Derived(derive) => match derive(session, verb)? {
            Output::Sequence(items) => fold(&items, session, verb),
            single => fold(std::slice::from_ref(&single), session, verb),
        },
        Output::Sequence(items) => fold(items, session, verb),
    }
}

fn fold(items: &[Output], session: &Session, verb: &str) -> Option<ActionResult> {
    let mut working_session = Cow::Borrowed(session);
    let mut working: Option<ActionResult> = None;

    for item in items {
        let Some(step) = process_output(item, &working_session, verb) else {
            continue;
        };
        let advanced = step.update.as_ref().map(|diff| working_session.apply(diff));
        let merged = match working.take() {
            Some(previous) => merge(previous, step),
            None => step,
        };
        if merged.close {
            return Some(merged);
        }
        if let Some(next) = advanced {
            working_session = Cow::Owned(next);
        }
        working = Some(merged);
    }

    working
}

/// Combine two results, `earlier` first.
pub fn merge(earlier: ActionResult, later: ActionResult) -> ActionResult {
    let message = [earlier.message, later.message]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let update = match (earlier.update, later.update) {
        (Some(first), Some(second)) => Some(first.merge(&second)),
        (first, second) => second.or(first),
    };

    ActionResult {
        message,
        update,
        close: earlier.close || later.close,
        context: newest(earlier.context, later.context),
        came_from: newest(earlier.came_from, later.came_from),
    }
}

fn newest(previous: Option<String>, latest: Option<String>) -> Option<String> {
    latest.filter(|value| !value.is_empty()).or(previous)
}
