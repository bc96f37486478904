//! Uniform access to raw registry values that may be an object, a list of
//! objects, null, or missing altogether.

use serde_json::Value;

/// A raw registry value classified by shape.
#[derive(Debug, Clone, Copy)]
pub enum OneOrMany<'a> {
    /// Missing or `null`.
    Absent,
    /// Any non-array value.
    One(&'a Value),
    /// An array, possibly empty. Historical lists are ordered oldest first.
    Many(&'a [Value]),
}

impl<'a> OneOrMany<'a> {
    pub fn of(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => OneOrMany::Absent,
            Some(Value::Array(items)) => OneOrMany::Many(items.as_slice()),
            Some(other) => OneOrMany::One(other),
        }
    }

    /// The first element of a list, or the value itself.
    pub fn first(&self) -> Option<&'a Value> {
        let picked = match *self {
            OneOrMany::Absent => None,
            OneOrMany::One(value) => Some(value),
            OneOrMany::Many(items) => items.first(),
        };
        picked.filter(|v| !v.is_null())
    }

    /// The last (most recent) element of a list, or the value itself.
    pub fn last(&self) -> Option<&'a Value> {
        let picked = match *self {
            OneOrMany::Absent => None,
            OneOrMany::One(value) => Some(value),
            OneOrMany::Many(items) => items.last(),
        };
        picked.filter(|v| !v.is_null())
    }

    /// Iterates every element, treating a single value as a list of one.
    pub fn iter(&self) -> impl Iterator<Item = &'a Value> {
        let items: &'a [Value] = match *self {
            OneOrMany::Absent => &[],
            OneOrMany::One(value) => std::slice::from_ref(value),
            OneOrMany::Many(items) => items,
        };
        items.iter().filter(|v| !v.is_null())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, OneOrMany::Absent)
    }
}

/// Walks nested object keys. `null` anywhere along the way counts as missing.
pub fn path<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in keys {
        current = current.get(key)?;
    }
    (!current.is_null()).then_some(current)
}

/// Coerces a scalar to trimmed text. Null, empty strings, objects and arrays
/// yield `None`.
pub fn text(value: Option<&Value>) -> Option<String> {
    let s = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!s.is_empty()).then_some(s)
}

/// [`text`] with the `"N/A"` default applied.
pub fn text_or_na(value: Option<&Value>) -> String {
    text(value).unwrap_or_else(|| super::NOT_AVAILABLE.to_string())
}
