//! Copy-on-write helpers for session collections.
//!
//! Handlers express state changes by building new sets and maps from the ones on the
//! session they were given. Every function here borrows its input and returns a fresh
//! `im` collection; the input is never modified, and thanks to structural sharing the
//! copy costs little.

use im::{OrdMap, OrdSet};

/// A new set containing everything in `set` plus `items`.
pub fn set_add<I, S>(set: &OrdSet<String>, items: I) -> OrdSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut next = set.clone();
    for item in items {
        next.insert(item.into());
    }
    next
}

/// A new set without `item`.
pub fn set_remove(set: &OrdSet<String>, item: &str) -> OrdSet<String> {
    set.without(item)
}

/// A new set with `to_add` inserted, then `to_remove` taken out.
pub fn set_mutate(set: &OrdSet<String>, to_add: &[&str], to_remove: &[&str]) -> OrdSet<String> {
    let mut next = set_add(set, to_add.iter().copied());
    for item in to_remove {
        next.remove(*item);
    }
    next
}

/// A new map with `key` set to `value`, or removed when `value` is `None`.
pub fn map_set(map: &OrdMap<String, String>, key: &str, value: Option<&str>) -> OrdMap<String, String> {
    match value {
        Some(value) => map.update(key.to_string(), value.to_string()),
        None => map.without(key),
    }
}

/// A new map with every entry of `partial` applied; `None` values delete their key.
pub fn map_merge<'a, I>(map: &OrdMap<String, String>, partial: I) -> OrdMap<String, String>
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    partial
        .into_iter()
        .fold(map.clone(), |acc, (key, value)| map_set(&acc, key, value))
}

/// A new map without `key`.
pub fn map_remove(map: &OrdMap<String, String>, key: &str) -> OrdMap<String, String> {
    map.without(key)
}
