//! Merge-on-update strategies.
//!
//! When a slot merges, the incoming document value is combined with the
//! value the slot already holds instead of replacing it. Which strategy
//! applies is decided by the slot's value kind.

use alloc::sync::Arc;
use core::fmt;
use std::collections::HashMap;

use bindery_core::{Obj, Value, ValueKind};

use crate::binder::BindContext;
use crate::{BindConfig, BindError, RawValue};

mod object;
pub use object::ObjectMerge;

mod sequence;
pub use sequence::SequenceMerge;

mod set;
pub use set::SetMerge;

mod map;
pub use map::MapMerge;

/// Combines an incoming document value with a slot's current value.
pub trait MergeStrategy: Send + Sync {
    /// Merge `incoming` into `existing`, returning the slot's new value.
    ///
    /// `existing` is never null. Strategies that mutate `existing` in place
    /// return it, so identity is preserved.
    fn merge(
        &self,
        existing: Value,
        incoming: RawValue,
        kind: &ValueKind,
        cx: &mut MergeContext<'_, '_>,
    ) -> Result<Value, BindError>;
}

/// The binder, as seen by a merge strategy.
pub struct MergeContext<'a, 'b> {
    cx: &'a mut BindContext<'b>,
}

impl<'a, 'b> MergeContext<'a, 'b> {
    pub(crate) fn new(cx: &'a mut BindContext<'b>) -> Self {
        Self { cx }
    }

    /// The configuration of the running bind.
    pub fn config(&self) -> &BindConfig {
        &self.cx.binder().config
    }

    /// Convert a document value to `kind` as the binder would, binding
    /// objects fresh.
    pub fn convert(&mut self, raw: RawValue, kind: &ValueKind) -> Result<Value, BindError> {
        self.cx.convert(raw, kind)
    }

    /// Bind a sub-document into `target`, as an update.
    ///
    /// Returns `target` itself for mutable types, a replacement otherwise.
    pub fn bind_into(&mut self, target: &Obj, raw: RawValue) -> Result<Obj, BindError> {
        self.cx.bind_into(target, raw)
    }

    /// Merge with the strategy for `kind` when there is one and both sides
    /// are non-null; convert otherwise.
    pub fn merge_or_convert(
        &mut self,
        existing: Value,
        raw: RawValue,
        kind: &ValueKind,
    ) -> Result<Value, BindError> {
        if existing.is_null() || raw.is_null() {
            return self.cx.convert(raw, kind);
        }
        self.cx.merge(existing, raw, kind)
    }
}

/// Families of value kinds a merge strategy can be registered for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MergeClass {
    /// `ValueKind::Object`
    Object,
    /// `ValueKind::Seq`
    Sequence,
    /// `ValueKind::Set`
    Set,
    /// `ValueKind::Map`
    Map,
}

impl MergeClass {
    /// The class of `kind`. Scalars have none.
    pub fn of(kind: &ValueKind) -> Option<Self> {
        match kind {
            ValueKind::Object(_) => Some(MergeClass::Object),
            ValueKind::Seq(_) => Some(MergeClass::Sequence),
            ValueKind::Set(_) => Some(MergeClass::Set),
            ValueKind::Map(_) => Some(MergeClass::Map),
            _ => None,
        }
    }
}

/// Merge strategies by class.
///
/// The default registry has the standard strategy for every class.
#[derive(Clone)]
pub struct MergeRegistry {
    strategies: HashMap<MergeClass, Arc<dyn MergeStrategy>>,
}

impl Default for MergeRegistry {
    fn default() -> Self {
        Self::empty()
            .with(MergeClass::Object, ObjectMerge)
            .with(MergeClass::Sequence, SequenceMerge::default())
            .with(MergeClass::Set, SetMerge)
            .with(MergeClass::Map, MapMerge)
    }
}

impl MergeRegistry {
    /// No strategies: every merge degrades to replace.
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Register `strategy` for `class`, replacing any earlier one.
    pub fn with(mut self, class: MergeClass, strategy: impl MergeStrategy + 'static) -> Self {
        self.strategies.insert(class, Arc::new(strategy));
        self
    }

    /// Remove the strategy for `class`.
    pub fn without(mut self, class: MergeClass) -> Self {
        self.strategies.remove(&class);
        self
    }

    /// The strategy that merges values of `kind`.
    pub fn strategy_for(&self, kind: &ValueKind) -> Option<&dyn MergeStrategy> {
        let class = MergeClass::of(kind)?;
        self.strategies.get(&class).map(|s| s.as_ref())
    }
}

impl fmt::Debug for MergeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut classes: Vec<&MergeClass> = self.strategies.keys().collect();
        classes.sort_by_key(|c| **c as u8);
        f.debug_struct("MergeRegistry")
            .field("classes", &classes)
            .finish()
    }
}
