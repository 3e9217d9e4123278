//! Key shaping for JSON objects.
//!
//! All functions take the object by value and return a new one.

use serde_json::{Map, Value};

/// Rename keys found in `renames` (old name -> new name); other keys are kept.
///
/// Non-string entries in `renames` are ignored. When a renamed key collides
/// with an existing one, the later key in iteration order wins.
#[must_use]
pub fn rename_keys(obj: Map<String, Value>, renames: &Map<String, Value>) -> Map<String, Value> {
    obj.into_iter()
        .map(|(key, value)| {
            let key = renames
                .get(&key)
                .and_then(Value::as_str)
                .filter(|new| !new.is_empty())
                .map_or(key, ToString::to_string);
            (key, value)
        })
        .collect()
}

/// Drop every key listed in `keys`.
#[must_use]
pub fn remove_keys(obj: Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    if keys.is_empty() {
        return obj;
    }
    tracing::debug!(?keys, "Removing properties");
    obj.into_iter()
        .filter(|(key, _)| !keys.contains(&key.as_str()))
        .collect()
}

/// Keep only the keys listed in `keys`; an empty list keeps nothing.
#[must_use]
pub fn keep_keys(obj: Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    if keys.is_empty() {
        return Map::new();
    }
    tracing::debug!(?keys, "Keeping only properties");
    obj.into_iter()
        .filter(|(key, _)| keys.contains(&key.as_str()))
        .collect()
}

/// Apply [`keep_keys`] to every object in `items`; non-objects pass through.
#[must_use]
pub fn keep_keys_in_all(items: Vec<Value>, keys: &[&str]) -> Vec<Value> {
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(obj) => Value::Object(keep_keys(obj, keys)),
            other => other,
        })
        .collect()
}
