use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use bindery_value::{Record, Value, ValueKind};

/// Writes a value into an instance. May have side effects on other fields.
pub type SetterFn = Arc<dyn Fn(&mut Record, Value) -> Result<(), String> + Send + Sync>;

/// Reads the current value of a property out of an instance.
pub type GetterFn = Arc<dyn Fn(&Record) -> Value + Send + Sync>;

/// Builds a fresh instance from creator arguments, in ordinal order.
pub type CreatorFn = Arc<dyn Fn(Vec<Value>) -> Result<Record, String> + Send + Sync>;

/// How a slot is reached on the target type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// Parameter of the selected creator
    CreatorParam {
        /// 0-based position in the creator's parameter list
        ordinal: usize,
    },
    /// Plain field, written directly into the record
    Field,
    /// Setter method
    Setter,
    /// Getter-only property: can be merged into, never replaced
    Getter,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::CreatorParam { ordinal } => write!(f, "creator parameter #{ordinal}"),
            SlotKind::Field => f.write_str("field"),
            SlotKind::Setter => f.write_str("setter"),
            SlotKind::Getter => f.write_str("getter"),
        }
    }
}

/// Key under which an injectable value is looked up.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum InjectKey {
    /// The slot's declared value kind
    Kind(ValueKind),
    /// An explicit name
    Name(String),
}

impl fmt::Display for InjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjectKey::Kind(kind) => write!(f, "kind `{kind}`"),
            InjectKey::Name(name) => write!(f, "name `{name}`"),
        }
    }
}

/// Where a slot's value comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingSource {
    /// The document entry with this name
    Document(String),
    /// The injectable value provider
    Injected(InjectKey),
}

/// What an explicit null in the document does to a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Nulls {
    /// Null overwrites the current value, discarding any merge
    Set,
    /// Null leaves the current value untouched
    Skip,
}

impl fmt::Display for Nulls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nulls::Set => f.write_str("set"),
            Nulls::Skip => f.write_str("skip"),
        }
    }
}

/// One bindable unit of a type.
#[derive(Clone)]
pub struct Slot {
    pub(crate) name: Arc<str>,
    pub(crate) kind: SlotKind,
    pub(crate) source: BindingSource,
    pub(crate) value_kind: ValueKind,
    pub(crate) merge: Option<bool>,
    pub(crate) nulls: Option<Nulls>,
    pub(crate) required: bool,
    pub(crate) transient: bool,
    pub(crate) setter: Option<SetterFn>,
    pub(crate) getter: Option<GetterFn>,
}

impl Slot {
    /// Declared name of the slot.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// How the slot is reached.
    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    /// Where the slot's value comes from.
    pub fn source(&self) -> &BindingSource {
        &self.source
    }

    /// Declared value kind.
    pub fn value_kind(&self) -> &ValueKind {
        &self.value_kind
    }

    /// Per-slot merge annotation.
    pub fn merge(&self) -> Option<bool> {
        self.merge
    }

    /// Per-slot null handling override.
    pub fn nulls(&self) -> Option<Nulls> {
        self.nulls
    }

    /// Absence of this slot's value is an error.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The slot never reads from the document.
    pub fn is_transient(&self) -> bool {
        self.transient
    }

    /// Document entry name, for document-sourced slots.
    pub fn document_name(&self) -> Option<&str> {
        match &self.source {
            BindingSource::Document(name) => Some(name),
            BindingSource::Injected(_) => None,
        }
    }

    /// Returns `true` if [`Slot::write`] can succeed.
    pub fn is_writable(&self) -> bool {
        match self.kind {
            SlotKind::Field | SlotKind::CreatorParam { .. } => true,
            SlotKind::Setter => self.setter.is_some(),
            SlotKind::Getter => false,
        }
    }

    /// Current value of the slot on `record`.
    ///
    /// `None` when the slot can't be read back, such as a setter without a
    /// paired getter.
    pub fn read(&self, record: &Record) -> Option<Value> {
        match self.kind {
            SlotKind::Field | SlotKind::CreatorParam { .. } => {
                Some(record.get(&self.name).cloned().unwrap_or_default())
            }
            SlotKind::Setter | SlotKind::Getter => self.getter.as_ref().map(|get| get(record)),
        }
    }

    /// Write `value` into `record`.
    pub fn write(&self, record: &mut Record, value: Value) -> Result<(), String> {
        match self.kind {
            SlotKind::Field | SlotKind::CreatorParam { .. } => {
                record.set(self.name.as_ref(), value);
                Ok(())
            }
            SlotKind::Setter => match &self.setter {
                Some(set) => set(record, value),
                None => Err(format!("setter `{}` has no setter function", self.name)),
            },
            SlotKind::Getter => Err(format!("`{}` is getter-only", self.name)),
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("source", &self.source)
            .field("value_kind", &self.value_kind)
            .field("merge", &self.merge)
            .field("nulls", &self.nulls)
            .field("required", &self.required)
            .field("transient", &self.transient)
            .finish_non_exhaustive()
    }
}
