//! Object instances: a [`Record`] holds the storage, an [`Obj`] shares it.
//!
//! Every bound instance lives behind an `Obj`. Two `Obj`s are the same
//! instance exactly when [`Obj::ptr_eq`] says so, which is what lets an
//! update bind hand back the very instance it was given.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt::{self, Debug, Formatter};

use indexmap::IndexMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::Value;

/// Storage of a single instance: its type name and its fields, in the
/// order they were first written.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    type_name: Arc<str>,
    fields: IndexMap<String, Value>,
}

impl Record {
    /// An instance of `type_name` with no fields set.
    pub fn new(type_name: impl Into<Arc<str>>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Builder-style [`Record::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Name of the type this record is an instance of.
    pub fn type_name(&self) -> &Arc<str> {
        &self.type_name
    }

    /// Current value of a field, if it was ever written.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns `true` if the field was ever written.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Write a field, returning its previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    /// Remove a field, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.shift_remove(name)
    }

    /// Iterate over fields in write order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields written.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field was written.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Shared handle to an instance.
///
/// Cloning an `Obj` clones the handle, not the instance.
#[derive(Clone)]
pub struct Obj(Arc<RwLock<Record>>);

impl Obj {
    /// Move a record behind a fresh handle.
    pub fn new(record: Record) -> Self {
        Self(Arc::new(RwLock::new(record)))
    }

    /// Returns `true` if both handles refer to the same instance.
    pub fn ptr_eq(&self, other: &Obj) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Lock the instance for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, Record> {
        self.0.read()
    }

    /// Lock the instance for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, Record> {
        self.0.write()
    }

    /// Name of the instance's type.
    pub fn type_name(&self) -> Arc<str> {
        self.read().type_name().clone()
    }

    /// Clone of a field's current value.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.read().get(name).cloned()
    }

    /// Write a field, returning its previous value.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.write().set(name, value)
    }

    /// Copy of the instance's storage.
    ///
    /// Nested objects are shared with the live instance, not copied.
    pub fn snapshot(&self) -> Record {
        self.read().clone()
    }

    /// Replace the instance's storage wholesale.
    pub fn restore(&self, record: Record) {
        *self.write() = record;
    }
}

impl From<Record> for Obj {
    fn from(record: Record) -> Self {
        Obj::new(record)
    }
}

thread_local! {
    /// Pairs of instances whose comparison is in progress on this thread.
    static COMPARING: RefCell<Vec<(usize, usize)>> = const { RefCell::new(Vec::new()) };
    /// Instances being formatted on this thread.
    static FORMATTING: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

impl Obj {
    fn addr(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }
}

/// Structural equality. Locks are released before nested objects are
/// compared, and a pair already under comparison further up the stack is
/// taken as equal, so cyclic graphs terminate.
impl PartialEq for Obj {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let pair = (self.addr(), other.addr());
        let entered = COMPARING.with(|c| {
            let mut c = c.borrow_mut();
            if c.contains(&pair) {
                return false;
            }
            c.push(pair);
            true
        });
        if !entered {
            return true;
        }
        let (a, b) = (self.snapshot(), other.snapshot());
        let equal = a == b;
        COMPARING.with(|c| c.borrow_mut().pop());
        equal
    }
}

impl Debug for Obj {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Some(record) = self.0.try_read().map(|r| r.clone()) else {
            return write!(f, "Obj(<locked> {:p})", Arc::as_ptr(&self.0));
        };
        let addr = self.addr();
        let entered = FORMATTING.with(|v| {
            let mut v = v.borrow_mut();
            if v.contains(&addr) {
                return false;
            }
            v.push(addr);
            true
        });
        if !entered {
            return write!(f, "{} {{ .. }}", record.type_name());
        }
        let result = write!(f, "{} ", record.type_name())
            .and_then(|()| f.debug_map().entries(record.fields()).finish());
        FORMATTING.with(|v| v.borrow_mut().pop());
        result
    }
}
