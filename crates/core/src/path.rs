//! Dotted-path access over JSON documents.
//!
//! Documents (base defaults, overrides, extensions, schema hints) are plain
//! `serde_json::Value` maps. A [`DocPath`] addresses a nested field by a
//! sequence of string keys; the operations here never mutate their input:
//! `set_path`/`delete_path` return a new document, copying only the maps along
//! the touched path and sharing everything else.

use core::str::FromStr;

use serde_json::{Map, Value};

use crate::error::DomainError;

/// A parsed dotted path ("config.pricing.basePrice"). Always has at least one
/// segment; blank segments are rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocPath(Vec<String>);

impl DocPath {
    /// Build a path from pre-split segments.
    pub fn new(segments: impl IntoIterator<Item = impl Into<String>>) -> Result<Self, DomainError> {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(|s| s.trim().is_empty()) {
            return Err(DomainError::validation("path must have non-blank segments"));
        }
        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn dotted(&self) -> String {
        self.0.join(".")
    }
}

impl FromStr for DocPath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.split('.').map(str::trim))
    }
}

impl core::fmt::Display for DocPath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.dotted())
    }
}

/// Value at `path`, or `None` if any segment is absent or the document is not
/// traversable at that point. Callers supply their own fallback.
pub fn get_path<'a>(doc: &'a Value, path: &DocPath) -> Option<&'a Value> {
    let mut cur = doc;
    for segment in path.segments() {
        cur = cur.as_object()?.get(segment)?;
    }
    Some(cur)
}

/// True only if every segment exists as an own key, terminal included.
///
/// Unlike `get_path` + fallback, this distinguishes "explicitly set to
/// null/0/false" from "absent", the presence test the override UI relies on.
pub fn has_path(doc: &Value, path: &DocPath) -> bool {
    let mut cur = doc;
    for segment in path.segments() {
        match cur.as_object().and_then(|m| m.get(segment)) {
            Some(next) => cur = next,
            None => return false,
        }
    }
    true
}

/// New document with `value` installed at `path`, creating intermediate maps
/// as needed. Non-map intermediates are displaced by fresh maps.
pub fn set_path(doc: &Value, path: &DocPath, value: Value) -> Value {
    set_inner(Some(doc), path.segments(), value)
}

fn set_inner(doc: Option<&Value>, segments: &[String], value: Value) -> Value {
    let mut map = match doc {
        Some(Value::Object(m)) => m.clone(),
        _ => Map::new(),
    };
    match segments {
        [last] => {
            map.insert(last.clone(), value);
        }
        [head, rest @ ..] => {
            let child = set_inner(map.get(head.as_str()), rest, value);
            map.insert(head.clone(), child);
        }
        [] => unreachable!("DocPath is never empty"),
    }
    Value::Object(map)
}

/// New document with the terminal key of `path` removed. Deleting a missing
/// path is a no-op that still returns an equivalent document.
pub fn delete_path(doc: &Value, path: &DocPath) -> Value {
    let Value::Object(map) = doc else {
        return Value::Object(Map::new());
    };
    let mut map = map.clone();
    delete_inner(&mut map, path.segments());
    Value::Object(map)
}

fn delete_inner(map: &mut Map<String, Value>, segments: &[String]) {
    match segments {
        [last] => {
            map.remove(last.as_str());
        }
        [head, rest @ ..] => {
            if let Some(Value::Object(child)) = map.get_mut(head.as_str()) {
                delete_inner(child, rest);
            }
        }
        [] => unreachable!("DocPath is never empty"),
    }
}
