//! Scalar coercion of document values.

use alloc::string::{String, ToString};
use core::fmt;

use bindery_core::{Value, ValueKind};
use indexmap::IndexMap;

use crate::RawValue;
use crate::document::raw_type;

/// Error raised when a document value doesn't fit a slot's kind.
#[derive(Clone, Debug, PartialEq)]
pub enum CoercionError {
    /// The raw value has the wrong type
    TypeMismatch {
        /// Kind the slot declares
        expected: ValueKind,
        /// Type of the raw value
        got: &'static str,
    },
    /// The raw value has the right type but an unusable value
    InvalidValue {
        /// Kind the slot declares
        expected: ValueKind,
        /// What is wrong with the value
        message: String,
    },
}

impl fmt::Display for CoercionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercionError::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            CoercionError::InvalidValue { expected, message } => {
                write!(f, "invalid {expected}: {message}")
            }
        }
    }
}

impl core::error::Error for CoercionError {}

/// Turns scalar document values into [`Value`]s of a declared kind.
///
/// The binder handles containers and objects itself and only hands scalar
/// kinds and [`ValueKind::Any`] to the coercer. Null never reaches it.
pub trait Coercer: Send + Sync {
    /// Coerce `raw` to `kind`.
    fn coerce(&self, raw: &RawValue, kind: &ValueKind) -> Result<Value, CoercionError>;
}

/// The standard coercer.
///
/// Lenient by default: numbers and booleans are accepted as strings, strings
/// holding numbers or booleans are parsed, integral floats are accepted as
/// integers.
#[derive(Clone, Copy, Debug)]
pub struct StdCoercer {
    lenient: bool,
}

impl Default for StdCoercer {
    fn default() -> Self {
        Self { lenient: true }
    }
}

impl StdCoercer {
    /// Only accept raw values whose type matches the kind exactly.
    pub fn strict() -> Self {
        Self { lenient: false }
    }

    fn mismatch(kind: &ValueKind, raw: &RawValue) -> CoercionError {
        CoercionError::TypeMismatch {
            expected: kind.clone(),
            got: raw_type(raw),
        }
    }

    fn int(&self, raw: &RawValue, kind: &ValueKind) -> Result<Value, CoercionError> {
        match raw {
            RawValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Ok(Value::Int(i));
                }
                if n.is_u64() {
                    return Err(CoercionError::InvalidValue {
                        expected: kind.clone(),
                        message: format!("{n} out of range for int"),
                    });
                }
                match n.as_f64() {
                    Some(f) if self.lenient && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        Ok(Value::Int(f as i64))
                    }
                    _ => Err(CoercionError::InvalidValue {
                        expected: kind.clone(),
                        message: format!("{n} is not an integer"),
                    }),
                }
            }
            RawValue::String(s) if self.lenient => {
                s.trim()
                    .parse::<i64>()
                    .map(Value::Int)
                    .map_err(|e| CoercionError::InvalidValue {
                        expected: kind.clone(),
                        message: format!("{s:?}: {e}"),
                    })
            }
            other => Err(Self::mismatch(kind, other)),
        }
    }

    fn float(&self, raw: &RawValue, kind: &ValueKind) -> Result<Value, CoercionError> {
        match raw {
            RawValue::Number(n) => n.as_f64().map(Value::Float).ok_or_else(|| {
                CoercionError::InvalidValue {
                    expected: kind.clone(),
                    message: format!("{n} cannot be represented as float"),
                }
            }),
            RawValue::String(s) if self.lenient => {
                s.trim()
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|e| CoercionError::InvalidValue {
                        expected: kind.clone(),
                        message: format!("{s:?}: {e}"),
                    })
            }
            other => Err(Self::mismatch(kind, other)),
        }
    }

    fn bool(&self, raw: &RawValue, kind: &ValueKind) -> Result<Value, CoercionError> {
        match raw {
            RawValue::Bool(b) => Ok(Value::Bool(*b)),
            RawValue::String(s) if self.lenient => match s.trim() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(CoercionError::InvalidValue {
                    expected: kind.clone(),
                    message: format!("{s:?} is neither true nor false"),
                }),
            },
            other => Err(Self::mismatch(kind, other)),
        }
    }

    fn string(&self, raw: &RawValue, kind: &ValueKind) -> Result<Value, CoercionError> {
        match raw {
            RawValue::String(s) => Ok(Value::String(s.clone())),
            RawValue::Number(n) if self.lenient => Ok(Value::String(n.to_string())),
            RawValue::Bool(b) if self.lenient => Ok(Value::String(b.to_string())),
            other => Err(Self::mismatch(kind, other)),
        }
    }
}

impl Coercer for StdCoercer {
    fn coerce(&self, raw: &RawValue, kind: &ValueKind) -> Result<Value, CoercionError> {
        match kind {
            ValueKind::Any => Ok(untyped(raw)),
            ValueKind::Bool => self.bool(raw, kind),
            ValueKind::Int => self.int(raw, kind),
            ValueKind::Float => self.float(raw, kind),
            ValueKind::String => self.string(raw, kind),
            // opaque values only ever enter through injection
            _ => Err(Self::mismatch(kind, raw)),
        }
    }
}

/// Convert a raw value without a declared kind.
pub(crate) fn untyped(raw: &RawValue) -> Value {
    match raw {
        RawValue::Null => Value::Null,
        RawValue::Bool(b) => Value::Bool(*b),
        RawValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n.as_f64().map(Value::Float).unwrap_or_default(),
        },
        RawValue::String(s) => Value::String(s.clone()),
        RawValue::Array(items) => Value::Seq(items.iter().map(untyped).collect()),
        RawValue::Object(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), untyped(v)))
                .collect::<IndexMap<_, _>>(),
        ),
    }
}
