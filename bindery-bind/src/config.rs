use std::collections::HashMap;

use bindery_core::{Nulls, ValueKind};

/// What happens to a creator argument the document doesn't supply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AbsentPolicy {
    /// Use the kind's default: zero for primitives, null otherwise
    #[default]
    Default,
    /// Fail the bind
    Fail,
}

/// What happens to document keys no slot consumed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnknownProperties {
    /// Drop them silently
    #[default]
    Ignore,
    /// Log them at warn level
    Warn,
    /// Fail the bind
    Fail,
}

/// How an incoming sequence combines with the one a slot already holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SequenceMergeMode {
    /// Append incoming elements
    #[default]
    Append,
    /// Overwrite by position, merging elements where possible, appending the tail
    IndexWise,
}

/// Per-value-kind policy override.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KindOverride {
    /// Null handling for slots of this kind
    pub nulls: Option<Nulls>,
    /// Merge-on-update for slots of this kind
    pub mergeable: Option<bool>,
}

impl KindOverride {
    /// Override null handling.
    pub fn nulls(mut self, nulls: Nulls) -> Self {
        self.nulls = Some(nulls);
        self
    }

    /// Override merge-on-update.
    pub fn mergeable(mut self, mergeable: bool) -> Self {
        self.mergeable = Some(mergeable);
        self
    }
}

/// Configuration of a [`Binder`](crate::Binder).
#[derive(Clone, Debug)]
pub struct BindConfig {
    /// Null handling when neither the slot nor its kind says otherwise
    pub default_nulls: Option<Nulls>,
    /// Merge-on-update when neither the slot nor its kind says otherwise
    pub default_mergeable: Option<bool>,
    /// Overrides keyed by a slot's declared value kind
    pub kind_overrides: HashMap<ValueKind, KindOverride>,
    /// Explicitly requested merges on unmergeable kinds fail instead of
    /// degrading to replace
    pub strict_merge: bool,
    /// Creator arguments missing from the document
    pub absent_creator_args: AbsentPolicy,
    /// Document keys no slot consumed
    pub unknown_properties: UnknownProperties,
    /// Sequence merge behavior
    pub sequence_merge: SequenceMergeMode,
    /// Maximum nesting of object binds
    pub max_depth: usize,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            default_nulls: None,
            default_mergeable: None,
            kind_overrides: HashMap::new(),
            strict_merge: false,
            absent_creator_args: AbsentPolicy::Default,
            unknown_properties: UnknownProperties::Ignore,
            sequence_merge: SequenceMergeMode::Append,
            max_depth: 128,
        }
    }
}

impl BindConfig {
    /// Global null handling default.
    pub fn with_default_nulls(mut self, nulls: Nulls) -> Self {
        self.default_nulls = Some(nulls);
        self
    }

    /// Global merge-on-update default.
    pub fn with_default_mergeable(mut self, mergeable: bool) -> Self {
        self.default_mergeable = Some(mergeable);
        self
    }

    /// Override policy for slots of `kind`.
    pub fn with_kind_override(mut self, kind: ValueKind, over: KindOverride) -> Self {
        self.kind_overrides.insert(kind, over);
        self
    }

    /// Fail on explicitly requested merges of unmergeable kinds.
    pub fn with_strict_merge(mut self, strict: bool) -> Self {
        self.strict_merge = strict;
        self
    }

    /// Policy for creator arguments missing from the document.
    pub fn with_absent_creator_args(mut self, policy: AbsentPolicy) -> Self {
        self.absent_creator_args = policy;
        self
    }

    /// Policy for unconsumed document keys.
    pub fn with_unknown_properties(mut self, policy: UnknownProperties) -> Self {
        self.unknown_properties = policy;
        self
    }

    /// Sequence merge behavior.
    pub fn with_sequence_merge(mut self, mode: SequenceMergeMode) -> Self {
        self.sequence_merge = mode;
        self
    }

    /// Maximum nesting of object binds.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Override for `kind`, if configured.
    pub fn kind_override(&self, kind: &ValueKind) -> Option<&KindOverride> {
        self.kind_overrides.get(kind)
    }
}
