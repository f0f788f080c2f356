//! Literal-or-derived values.
//!
//! World content often needs text or data that depends on the player's state (a room that
//! reads differently once the lamp is lit, exits that appear after a door is opened).
//! Such fields hold a [`Value`], and every reader goes through [`Value::resolve`].

use std::fmt;
use std::sync::Arc;

use gametools::{Spinner, Wedge};
use parley_data::Session;

/// Function form of a [`Value`]: receives the session and, when known, the verb being resolved.
pub type Derivation<T> = Arc<dyn Fn(&Session, Option<&str>) -> T + Send + Sync>;

/// A value that is either fixed or computed from the session.
#[derive(Clone)]
pub enum Value<T> {
    Literal(T),
    Derived(Derivation<T>),
}

impl<T: Clone> Value<T> {
    /// Wrap a closure as a derived value.
    pub fn derived<F>(f: F) -> Value<T>
    where
        F: Fn(&Session, Option<&str>) -> T + Send + Sync + 'static,
    {
        Value::Derived(Arc::new(f))
    }

    /// Produce the concrete value for this session.
    pub fn resolve(&self, session: &Session, verb: Option<&str>) -> T {
        match self {
            Value::Literal(value) => value.clone(),
            Value::Derived(derive) => derive(session, verb),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Value::Literal(_))
    }
}

impl<T: Default> Default for Value<T> {
    fn default() -> Self {
        Value::Literal(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Value::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

impl From<&str> for Value<String> {
    fn from(text: &str) -> Self {
        Value::Literal(text.to_string())
    }
}

impl From<String> for Value<String> {
    fn from(text: String) -> Self {
        Value::Literal(text)
    }
}

/// A derived text value that picks one of `options` at random on every resolution.
///
/// This is the only nondeterministic value in the engine; worlds that need reproducible
/// output should avoid it.
pub fn pick(options: &[&str]) -> Value<String> {
    let wedges = options.iter().map(|text| Wedge::new((*text).to_string())).collect::<Vec<_>>();
    let spinner = Spinner::new(wedges);
    Value::derived(move |_, _| spinner.spin().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_resolves_to_itself() {
        let session = Session::new("s", "w", "hall");
        let value: Value<String> = "A quiet hall.".into();
        assert!(value.is_literal());
        assert_eq!(value.resolve(&session, None), "A quiet hall.");
    }

    #[test]
    fn derived_sees_session_and_verb() {
        let mut session = Session::new("s", "w", "hall");
        let value = Value::derived(|session: &Session, verb: Option<&str>| {
            format!("{}:{}", session.flag("lamp").unwrap_or("dark"), verb.unwrap_or("-"))
        });
        assert_eq!(value.resolve(&session, Some("look")), "dark:look");

        session.flags.insert("lamp".into(), "lit".into());
        assert_eq!(value.resolve(&session, None), "lit:-");
    }

    #[test]
    fn pick_returns_one_of_the_options() {
        let session = Session::new("s", "w", "hall");
        let value = pick(&["drip", "drop"]);
        for _ in 0..10 {
            let text = value.resolve(&session, None);
            assert!(text == "drip" || text == "drop");
        }
    }
}
