//! Injectable values: out-of-band values slots can be bound from.

use std::collections::HashMap;

use bindery_core::{InjectKey, Value, ValueKind};

/// Read-only registry of values that can be injected into slots.
///
/// Looked up at most once per slot per bind. Shared across concurrent binds.
pub trait InjectableValues: Send + Sync {
    /// The value registered under `key`, if any.
    fn lookup(&self, key: &InjectKey) -> Option<Value>;
}

impl<T: InjectableValues + ?Sized> InjectableValues for &T {
    fn lookup(&self, key: &InjectKey) -> Option<Value> {
        (**self).lookup(key)
    }
}

/// Map-backed injectable values.
///
/// Values are handed out as clones, so shared values such as
/// [`Opaque`](bindery_core::Opaque) and [`Obj`](bindery_core::Obj) keep their
/// identity.
#[derive(Clone, Debug, Default)]
pub struct StdInjectables {
    values: HashMap<InjectKey, Value>,
}

impl StdInjectables {
    /// No values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a value looked up by value kind.
    pub fn add_kind(mut self, kind: ValueKind, value: impl Into<Value>) -> Self {
        self.values.insert(InjectKey::Kind(kind), value.into());
        self
    }

    /// Register a value looked up by name.
    pub fn add_named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(InjectKey::Name(name.into()), value.into());
        self
    }

    /// Register a value, returning the one previously under `key`.
    pub fn insert(&mut self, key: InjectKey, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key, value.into())
    }

    /// Number of registered values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl InjectableValues for StdInjectables {
    fn lookup(&self, key: &InjectKey) -> Option<Value> {
        self.values.get(key).cloned()
    }
}

/// No injectable values at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyInjectables;

impl InjectableValues for EmptyInjectables {
    fn lookup(&self, _key: &InjectKey) -> Option<Value> {
        None
    }
}
