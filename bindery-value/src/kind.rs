use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;

use crate::Value;

/// The declared kind of a value.
///
/// A slot's kind drives coercion of document values and doubles as the
/// lookup key for injectable values that are not requested by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Anything; document values are converted structurally
    Any,
    /// Boolean
    Bool,
    /// Signed 64-bit integer
    Int,
    /// 64-bit float
    Float,
    /// UTF-8 string
    String,
    /// Ordered sequence of elements
    Seq(Box<ValueKind>),
    /// Duplicate-free collection of elements
    Set(Box<ValueKind>),
    /// String-keyed map
    Map(Box<ValueKind>),
    /// Instance of the named object type
    Object(Arc<str>),
    /// Reference value that can only be injected
    Opaque(Arc<str>),
}

impl ValueKind {
    /// Kind of instances of the named object type.
    pub fn object(type_name: impl Into<Arc<str>>) -> Self {
        ValueKind::Object(type_name.into())
    }

    /// Kind of opaque values with the given name.
    pub fn opaque(name: impl Into<Arc<str>>) -> Self {
        ValueKind::Opaque(name.into())
    }

    /// Sequence of `element`.
    pub fn seq(element: ValueKind) -> Self {
        ValueKind::Seq(Box::new(element))
    }

    /// Set of `element`.
    pub fn set(element: ValueKind) -> Self {
        ValueKind::Set(Box::new(element))
    }

    /// Map from strings to `element`.
    pub fn map(element: ValueKind) -> Self {
        ValueKind::Map(Box::new(element))
    }

    /// Element kind of a container kind.
    pub fn element(&self) -> Option<&ValueKind> {
        match self {
            ValueKind::Seq(e) | ValueKind::Set(e) | ValueKind::Map(e) => Some(e),
            _ => None,
        }
    }

    /// Returns `true` for kinds that hold a single value rather than a
    /// container or object.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            ValueKind::Any
                | ValueKind::Bool
                | ValueKind::Int
                | ValueKind::Float
                | ValueKind::String
                | ValueKind::Opaque(_)
        )
    }

    /// The value a slot of this kind takes when nothing was supplied.
    ///
    /// Primitives get their zero value, everything else is null.
    pub fn default_value(&self) -> Value {
        match self {
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Int => Value::Int(0),
            ValueKind::Float => Value::Float(0.0),
            _ => Value::Null,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Any => f.write_str("any"),
            ValueKind::Bool => f.write_str("bool"),
            ValueKind::Int => f.write_str("int"),
            ValueKind::Float => f.write_str("float"),
            ValueKind::String => f.write_str("string"),
            ValueKind::Seq(e) => write!(f, "seq<{e}>"),
            ValueKind::Set(e) => write!(f, "set<{e}>"),
            ValueKind::Map(e) => write!(f, "map<{e}>"),
            ValueKind::Object(name) => f.write_str(name),
            ValueKind::Opaque(name) => write!(f, "opaque<{name}>"),
        }
    }
}
