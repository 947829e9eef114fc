use alloc::string::String;
use core::fmt;

/// Errors raised while turning raw shape metadata into a descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeError {
    /// The type can't be bound at all.
    UnboundableType {
        /// The offending type.
        type_name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// More than one creator qualifies and nothing says which one to use.
    ConstructorAmbiguity {
        /// The offending type.
        type_name: String,
        /// How many creators qualified.
        candidates: usize,
    },
}

impl ShapeError {
    pub(crate) fn unboundable(type_name: &str, reason: impl Into<String>) -> Self {
        ShapeError::UnboundableType {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Name of the type the error is about.
    pub fn type_name(&self) -> &str {
        match self {
            ShapeError::UnboundableType { type_name, .. }
            | ShapeError::ConstructorAmbiguity { type_name, .. } => type_name,
        }
    }
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::UnboundableType { type_name, reason } => {
                write!(f, "type `{type_name}` cannot be bound: {reason}")
            }
            ShapeError::ConstructorAmbiguity {
                type_name,
                candidates,
            } => write!(
                f,
                "type `{type_name}` has {candidates} candidate creators and none is marked"
            ),
        }
    }
}

impl core::error::Error for ShapeError {}
