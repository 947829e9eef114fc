use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use bindery_core::{InjectKey, ShapeDescriptor, ShapeError, Slot, SlotKind, ValueKind};

use crate::CoercionError;

/// A segment in a binding path
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// A property of an object
    Field(String),
    /// An index in a sequence or set
    Index(usize),
    /// A key in a map
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, ".{name}"),
            PathSegment::Index(i) => write!(f, "[{i}]"),
            PathSegment::Key(key) => write!(f, "[{key:?}]"),
        }
    }
}

/// Identity of the slot an error is attributed to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotRef {
    /// Type owning the slot
    pub type_name: Arc<str>,
    /// Declared name of the slot
    pub name: Arc<str>,
    /// How the slot is reached
    pub kind: SlotKind,
}

impl SlotRef {
    /// Reference to `slot` of the type described by `descriptor`.
    pub fn new(descriptor: &ShapeDescriptor, slot: &Slot) -> Self {
        Self {
            type_name: descriptor.type_name().clone(),
            name: slot.name().into(),
            kind: slot.kind(),
        }
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}` of `{}`", self.kind, self.name, self.type_name)
    }
}

/// Error returned by a bind.
///
/// Carries the first failure encountered; nothing of a failed bind is ever
/// left behind in the target.
#[derive(Debug)]
pub struct BindError {
    /// The specific kind of error
    pub kind: BindErrorKind,
    /// Path through the document where the error occurred
    pub path: Vec<PathSegment>,
    /// The slot being resolved when the error occurred
    pub slot: Option<SlotRef>,
}

impl BindError {
    /// Create a new BindError with an empty path and no slot
    pub fn new(kind: BindErrorKind) -> Self {
        Self {
            kind,
            path: Vec::new(),
            slot: None,
        }
    }

    /// Add a path segment (prepends since we unwind from error site)
    pub fn with_path(mut self, segment: PathSegment) -> Self {
        self.path.insert(0, segment);
        self
    }

    /// Attribute the error to a slot, unless a more specific one already is.
    pub fn with_slot(mut self, slot: SlotRef) -> Self {
        if self.slot.is_none() {
            self.slot = Some(slot);
        }
        self
    }

    /// Format the path as a string
    pub fn path_string(&self) -> String {
        if self.path.is_empty() {
            return "<root>".into();
        }
        use core::fmt::Write;
        let mut s = String::new();
        for seg in &self.path {
            let _ = write!(s, "{seg}");
        }
        match s.strip_prefix('.') {
            Some(rest) => rest.into(),
            None => s,
        }
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.path.is_empty() {
            write!(f, "at {}: ", self.path_string())?;
        }
        write!(f, "{}", self.kind)?;
        if let Some(slot) = &self.slot {
            write!(f, " ({slot})")?;
        }
        Ok(())
    }
}

impl core::error::Error for BindError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match &self.kind {
            BindErrorKind::Shape(e) => Some(e),
            BindErrorKind::Coercion(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BindErrorKind> for BindError {
    fn from(kind: BindErrorKind) -> Self {
        BindError::new(kind)
    }
}

impl From<ShapeError> for BindError {
    fn from(e: ShapeError) -> Self {
        BindError::new(BindErrorKind::Shape(e))
    }
}

impl From<CoercionError> for BindError {
    fn from(e: CoercionError) -> Self {
        BindError::new(BindErrorKind::Coercion(e))
    }
}

/// Specific error kinds for binding.
#[derive(Debug)]
pub enum BindErrorKind {
    /// The target type (or a nested one) has no usable descriptor
    Shape(ShapeError),
    /// An injected slot found nothing in the provider
    MissingInjectable {
        /// The key that was looked up
        key: InjectKey,
    },
    /// A document value could not be coerced to the slot's kind
    Coercion(CoercionError),
    /// Merge was requested on a kind no merge strategy handles
    UnmergeableType {
        /// The kind of the slot
        kind: ValueKind,
    },
    /// A required creator argument is absent
    MissingRequired,
    /// A document key no slot consumed
    UnknownProperty {
        /// The key
        name: String,
    },
    /// A getter-only slot received a value it could not merge
    ReadOnlySlot,
    /// The creator function failed
    Creator {
        /// What the creator reported
        message: String,
    },
    /// A setter function failed
    Setter {
        /// What the setter reported
        message: String,
    },
    /// Objects nest deeper than allowed
    DepthExceeded {
        /// The configured limit
        limit: usize,
    },
    /// An update target is an instance of a different type
    TargetMismatch {
        /// Type being bound
        expected: Arc<str>,
        /// Type of the existing instance
        found: Arc<str>,
    },
}

impl fmt::Display for BindErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindErrorKind::Shape(e) => write!(f, "{e}"),
            BindErrorKind::MissingInjectable { key } => {
                write!(f, "no injectable value for {key}")
            }
            BindErrorKind::Coercion(e) => write!(f, "{e}"),
            BindErrorKind::UnmergeableType { kind } => {
                write!(f, "cannot merge values of kind `{kind}`")
            }
            BindErrorKind::MissingRequired => f.write_str("missing required value"),
            BindErrorKind::UnknownProperty { name } => write!(f, "unknown property `{name}`"),
            BindErrorKind::ReadOnlySlot => {
                f.write_str("getter-only slot can only be merged into")
            }
            BindErrorKind::Creator { message } => write!(f, "creator failed: {message}"),
            BindErrorKind::Setter { message } => write!(f, "setter failed: {message}"),
            BindErrorKind::DepthExceeded { limit } => {
                write!(f, "objects nest deeper than {limit} levels")
            }
            BindErrorKind::TargetMismatch { expected, found } => {
                write!(f, "cannot update a `{found}` as a `{expected}`")
            }
        }
    }
}
