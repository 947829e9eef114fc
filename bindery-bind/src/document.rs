//! Document sources: the parsed key/value tree a bind reads from.

use alloc::string::String;
use alloc::vec::Vec;

use indexmap::IndexMap;

/// A parsed document value. `Null` is recognized without coercion.
pub type RawValue = serde_json::Value;

/// The properties of one object in a document.
///
/// Values are consumed as the binder resolves slots; whatever is left once
/// every slot is resolved is reported to the unknown-property policy.
pub trait DocumentSource {
    /// Returns `true` if `name` is present and not yet consumed.
    fn has(&self, name: &str) -> bool;

    /// Consume the value of `name`.
    fn take_value(&mut self, name: &str) -> Option<RawValue>;

    /// Keys not yet consumed, in document order.
    fn remaining_keys(&self) -> Vec<String>;
}

/// Ordered in-memory document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapDocument {
    entries: IndexMap<String, RawValue>,
}

impl MapDocument {
    /// An empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// A document over the given entries.
    pub fn from_map(entries: IndexMap<String, RawValue>) -> Self {
        Self { entries }
    }

    /// A document over a JSON object. Returns `None` for anything else.
    pub fn from_value(value: RawValue) -> Option<Self> {
        match value {
            RawValue::Object(map) => Some(Self {
                entries: map.into_iter().collect(),
            }),
            _ => None,
        }
    }

    /// Add an entry, replacing an existing one with the same key.
    pub fn insert(&mut self, name: impl Into<String>, value: RawValue) -> &mut Self {
        self.entries.insert(name.into(), value);
        self
    }

    /// Chainable [`MapDocument::insert`].
    pub fn with(mut self, name: impl Into<String>, value: RawValue) -> Self {
        self.insert(name, value);
        self
    }

    /// Number of unconsumed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if every entry was consumed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DocumentSource for MapDocument {
    fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    fn take_value(&mut self, name: &str) -> Option<RawValue> {
        self.entries.shift_remove(name)
    }

    fn remaining_keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

/// Short description of a raw value's type, for error messages.
pub(crate) fn raw_type(raw: &RawValue) -> &'static str {
    match raw {
        RawValue::Null => "null",
        RawValue::Bool(_) => "bool",
        RawValue::Number(_) => "number",
        RawValue::String(_) => "string",
        RawValue::Array(_) => "array",
        RawValue::Object(_) => "object",
    }
}
