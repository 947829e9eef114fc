use alloc::vec::Vec;

use bindery_core::{
    BindingSource, InjectKey, Nulls, Obj, Record, ShapeDescriptor, Slot, SlotKind, Value,
    ValueKind,
};
use indexmap::IndexMap;

use super::{BindTarget, Binder};
use crate::document::raw_type;
use crate::{
    AbsentPolicy, BindError, BindErrorKind, CoercionError, DocumentSource, InjectableValues,
    MapDocument, MergeContext, PathSegment, RawValue, ResolvedPolicy, SlotRef, UnknownProperties,
    resolve_policy,
};

/// Where a bind of one object currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    ResolvingConstructor,
    Instantiating,
    ResolvingRemainingSlots,
    Done,
    Failed,
}

/// Records written to by a bind, with their contents before the first write.
#[derive(Default)]
struct Journal {
    entries: Vec<(Obj, Record)>,
}

impl Journal {
    fn touch(&mut self, obj: &Obj) {
        if !self.entries.iter().any(|(o, _)| o.ptr_eq(obj)) {
            self.entries.push((obj.clone(), obj.snapshot()));
        }
    }

    fn rollback(self) {
        for (obj, record) in self.entries.into_iter().rev() {
            obj.restore(record);
        }
    }
}

/// State of one top-level bind, threaded through nested binds and merges.
pub(crate) struct BindContext<'a> {
    binder: &'a Binder,
    injectables: &'a dyn InjectableValues,
    journal: Journal,
    depth: usize,
}

impl<'a> BindContext<'a> {
    pub(crate) fn new(binder: &'a Binder, injectables: &'a dyn InjectableValues) -> Self {
        Self {
            binder,
            injectables,
            journal: Journal::default(),
            depth: 0,
        }
    }

    pub(crate) fn binder(&self) -> &'a Binder {
        self.binder
    }

    pub(crate) fn commit(self) {
        trace!(records = self.journal.entries.len(), "bind committed");
    }

    pub(crate) fn rollback(self) {
        trace!(records = self.journal.entries.len(), "restoring touched records");
        self.journal.rollback();
    }

    /// Bind one object, nested or top-level.
    pub(crate) fn bind_object(
        &mut self,
        type_name: &str,
        doc: &mut dyn DocumentSource,
        target: BindTarget,
    ) -> Result<Obj, BindError> {
        let limit = self.binder.config.max_depth;
        if self.depth >= limit {
            return Err(BindErrorKind::DepthExceeded { limit }.into());
        }
        self.depth += 1;
        let result = self.bind_descriptor(type_name, doc, target);
        self.depth -= 1;
        result
    }

    fn bind_descriptor(
        &mut self,
        type_name: &str,
        doc: &mut dyn DocumentSource,
        target: BindTarget,
    ) -> Result<Obj, BindError> {
        let descriptor = self.binder.descriptor(type_name)?;
        match self.run(&descriptor, doc, target) {
            Ok(obj) => {
                self.enter(&descriptor, Phase::Done);
                Ok(obj)
            }
            Err(e) => {
                self.enter(&descriptor, Phase::Failed);
                Err(e)
            }
        }
    }

    #[cfg_attr(not(any(test, feature = "tracing")), allow(unused_variables))]
    fn enter(&self, descriptor: &ShapeDescriptor, phase: Phase) {
        trace!(
            type_name = %descriptor.type_name(),
            depth = self.depth,
            ?phase,
            "bind phase"
        );
    }

    fn run(
        &mut self,
        descriptor: &ShapeDescriptor,
        doc: &mut dyn DocumentSource,
        target: BindTarget,
    ) -> Result<Obj, BindError> {
        self.enter(descriptor, Phase::ResolvingConstructor);
        if let BindTarget::Update(existing) = &target {
            let found = existing.type_name();
            if found != *descriptor.type_name() {
                return Err(BindErrorKind::TargetMismatch {
                    expected: descriptor.type_name().clone(),
                    found,
                }
                .into());
            }
        }
        let obj = match target {
            BindTarget::Update(obj) if descriptor.is_mutable() => {
                self.update_creator_fields(descriptor, &obj, doc)?;
                self.enter(descriptor, Phase::Instantiating);
                trace!("updating existing instance in place");
                obj
            }
            BindTarget::Update(original) => {
                let snapshot = original.snapshot();
                let args = self.creator_args(descriptor, doc, Some(&snapshot))?;
                self.enter(descriptor, Phase::Instantiating);
                let obj = self.instantiate(descriptor, args)?;
                carry_over(descriptor, &snapshot, &obj, doc);
                obj
            }
            BindTarget::New => {
                let args = self.creator_args(descriptor, doc, None)?;
                self.enter(descriptor, Phase::Instantiating);
                self.instantiate(descriptor, args)?
            }
        };

        self.enter(descriptor, Phase::ResolvingRemainingSlots);
        for slot in descriptor.slots() {
            self.resolve_slot(slot, &obj, doc)
                .map_err(|e| e.with_slot(SlotRef::new(descriptor, slot)))?;
        }

        self.report_unknown(descriptor, doc)?;
        Ok(obj)
    }

    fn creator_args(
        &mut self,
        descriptor: &ShapeDescriptor,
        doc: &mut dyn DocumentSource,
        original: Option<&Record>,
    ) -> Result<Vec<Value>, BindError> {
        let mut args = Vec::with_capacity(descriptor.creator_slots().len());
        for slot in descriptor.creator_slots() {
            let arg = self
                .creator_arg(slot, doc, original)
                .map_err(|e| e.with_slot(SlotRef::new(descriptor, slot)))?;
            args.push(arg);
        }
        Ok(args)
    }

    fn creator_arg(
        &mut self,
        slot: &Slot,
        doc: &mut dyn DocumentSource,
        original: Option<&Record>,
    ) -> Result<Value, BindError> {
        let name = match slot.source() {
            BindingSource::Injected(key) => return self.inject(key),
            BindingSource::Document(name) => name,
        };

        match doc.take_value(name) {
            Some(RawValue::Null) => {
                if self.policy(slot)?.nulls == Nulls::Set {
                    return Ok(Value::Null);
                }
                trace!(slot = slot.name(), "null skipped, argument is absent");
            }
            Some(raw) => {
                return self
                    .convert(raw, slot.value_kind())
                    .map_err(|e| e.with_path(PathSegment::Field(name.clone())));
            }
            None => {}
        }

        if let Some(value) = original.and_then(|record| record.get(name)) {
            trace!(property = name.as_str(), "argument carried over from original");
            return Ok(value.clone());
        }
        if slot.is_required() {
            return Err(BindErrorKind::MissingRequired.into());
        }
        match self.binder.config.absent_creator_args {
            AbsentPolicy::Default => Ok(slot.value_kind().default_value()),
            AbsentPolicy::Fail => Err(BindErrorKind::MissingRequired.into()),
        }
    }

    /// Creator properties of an in-place update: construction doesn't run,
    /// so present values go straight to the record field named after the
    /// property.
    fn update_creator_fields(
        &mut self,
        descriptor: &ShapeDescriptor,
        obj: &Obj,
        doc: &mut dyn DocumentSource,
    ) -> Result<(), BindError> {
        for slot in descriptor.creator_slots() {
            let Some(name) = slot.document_name() else {
                continue;
            };
            let Some(raw) = doc.take_value(name) else {
                continue;
            };
            if !obj.read().contains(name) {
                trace!(property = name, "no field for creator property, discarded");
                continue;
            }

            let slot_ref = || SlotRef::new(descriptor, slot);
            let value = if raw.is_null() {
                let policy = self.policy(slot).map_err(|e| e.with_slot(slot_ref()))?;
                if policy.nulls == Nulls::Skip {
                    continue;
                }
                Value::Null
            } else {
                self.convert(raw, slot.value_kind()).map_err(|e| {
                    e.with_path(PathSegment::Field(name.into()))
                        .with_slot(slot_ref())
                })?
            };
            self.journal.touch(obj);
            obj.write().set(name, value);
        }
        Ok(())
    }

    fn instantiate(
        &mut self,
        descriptor: &ShapeDescriptor,
        args: Vec<Value>,
    ) -> Result<Obj, BindError> {
        let record = descriptor
            .construct(args)
            .map_err(|message| BindError::new(BindErrorKind::Creator { message }))?;
        Ok(Obj::new(record))
    }

    fn resolve_slot(
        &mut self,
        slot: &Slot,
        obj: &Obj,
        doc: &mut dyn DocumentSource,
    ) -> Result<(), BindError> {
        let name = match slot.source() {
            BindingSource::Injected(key) => {
                if slot.is_transient() && doc.take_value(slot.name()).is_some() {
                    trace!(slot = slot.name(), "transient, document value discarded");
                }
                let value = self.inject(key)?;
                return self.assign(obj, slot, value);
            }
            BindingSource::Document(name) => name,
        };

        let Some(raw) = doc.take_value(name) else {
            return Ok(());
        };
        if slot.is_transient() {
            trace!(slot = slot.name(), "transient, document value discarded");
            return Ok(());
        }

        let policy = self.policy(slot)?;
        trace!(slot = slot.name(), nulls = %policy.nulls, merge = policy.merge, "policy");
        let at = |e: BindError| e.with_path(PathSegment::Field(name.clone()));

        if raw.is_null() {
            if policy.nulls == Nulls::Skip || slot.kind() == SlotKind::Getter {
                trace!(slot = slot.name(), "null skipped");
                return Ok(());
            }
            return self.assign(obj, slot, Value::Null);
        }

        let current = if policy.merge {
            // read, then release the lock before recursing
            let record = obj.read();
            slot.read(&record)
        } else {
            None
        };

        match current {
            Some(current) if !current.is_null() => {
                let merged = self
                    .merge(current.clone(), raw, slot.value_kind())
                    .map_err(at)?;
                if slot.kind() == SlotKind::Getter {
                    // a getter hands out its value; only in-place merges stick
                    return if merged.same(&current) {
                        Ok(())
                    } else {
                        Err(at(BindErrorKind::ReadOnlySlot.into()))
                    };
                }
                self.assign(obj, slot, merged)
            }
            _ if slot.kind() == SlotKind::Getter => Err(at(BindErrorKind::ReadOnlySlot.into())),
            _ => {
                let value = self.convert(raw, slot.value_kind()).map_err(at)?;
                self.assign(obj, slot, value)
            }
        }
    }

    fn assign(&mut self, obj: &Obj, slot: &Slot, value: Value) -> Result<(), BindError> {
        self.journal.touch(obj);
        let mut record = obj.write();
        slot.write(&mut record, value)
            .map_err(|message| BindError::new(BindErrorKind::Setter { message }))
    }

    #[cfg_attr(not(any(test, feature = "tracing")), allow(unused_variables))]
    fn report_unknown(
        &self,
        descriptor: &ShapeDescriptor,
        doc: &dyn DocumentSource,
    ) -> Result<(), BindError> {
        let remaining = doc.remaining_keys();
        if remaining.is_empty() {
            return Ok(());
        }
        match self.binder.config.unknown_properties {
            UnknownProperties::Ignore => {
                trace!(
                    type_name = %descriptor.type_name(),
                    properties = ?remaining,
                    "ignoring unknown properties"
                );
                Ok(())
            }
            UnknownProperties::Warn => {
                warn!(
                    type_name = %descriptor.type_name(),
                    properties = ?remaining,
                    "unknown properties"
                );
                Ok(())
            }
            UnknownProperties::Fail => match remaining.into_iter().next() {
                Some(name) => Err(BindErrorKind::UnknownProperty { name }.into()),
                None => Ok(()),
            },
        }
    }

    fn inject(&self, key: &InjectKey) -> Result<Value, BindError> {
        self.injectables.lookup(key).ok_or_else(|| {
            BindError::new(BindErrorKind::MissingInjectable { key: key.clone() })
        })
    }

    fn policy(&self, slot: &Slot) -> Result<ResolvedPolicy, BindError> {
        Ok(resolve_policy(
            slot,
            &self.binder.config,
            &self.binder.merges,
        )?)
    }

    /// Merge `raw` into `existing` with the strategy for `kind`, converting
    /// instead when there is none.
    pub(crate) fn merge(
        &mut self,
        existing: Value,
        raw: RawValue,
        kind: &ValueKind,
    ) -> Result<Value, BindError> {
        let binder = self.binder;
        match binder.merges.strategy_for(kind) {
            Some(strategy) => {
                trace!(%kind, "merging");
                strategy.merge(existing, raw, kind, &mut MergeContext::new(self))
            }
            None => self.convert(raw, kind),
        }
    }

    /// Bind `raw` into the existing object `target`.
    pub(crate) fn bind_into(&mut self, target: &Obj, raw: RawValue) -> Result<Obj, BindError> {
        let type_name = target.type_name();
        match raw {
            RawValue::Object(map) => {
                let mut doc = MapDocument::from_map(map.into_iter().collect());
                self.bind_object(&type_name, &mut doc, BindTarget::Update(target.clone()))
            }
            other => Err(CoercionError::TypeMismatch {
                expected: ValueKind::Object(type_name),
                got: raw_type(&other),
            }
            .into()),
        }
    }

    /// Convert a document value to `kind`. Objects are bound fresh,
    /// containers element by element, scalars go to the coercer.
    pub(crate) fn convert(&mut self, raw: RawValue, kind: &ValueKind) -> Result<Value, BindError> {
        match (kind, raw) {
            (_, RawValue::Null) => Ok(Value::Null),
            (ValueKind::Object(type_name), RawValue::Object(map)) => {
                let mut doc = MapDocument::from_map(map.into_iter().collect());
                self.bind_object(type_name, &mut doc, BindTarget::New)
                    .map(Value::Object)
            }
            (ValueKind::Seq(element), RawValue::Array(items)) => {
                self.convert_items(items, element).map(Value::Seq)
            }
            (ValueKind::Set(element), RawValue::Array(items)) => {
                self.convert_items(items, element).map(Value::set_from)
            }
            (ValueKind::Map(element), RawValue::Object(map)) => {
                let mut entries = IndexMap::with_capacity(map.len());
                for (key, raw) in map {
                    let value = self
                        .convert(raw, element)
                        .map_err(|e| e.with_path(PathSegment::Key(key.clone())))?;
                    entries.insert(key, value);
                }
                Ok(Value::Map(entries))
            }
            (
                ValueKind::Object(_) | ValueKind::Seq(_) | ValueKind::Set(_) | ValueKind::Map(_),
                raw,
            ) => Err(CoercionError::TypeMismatch {
                expected: kind.clone(),
                got: raw_type(&raw),
            }
            .into()),
            (_, raw) => Ok(self.binder.coercer.coerce(&raw, kind)?),
        }
    }

    fn convert_items(
        &mut self,
        items: Vec<RawValue>,
        element: &ValueKind,
    ) -> Result<Vec<Value>, BindError> {
        items
            .into_iter()
            .enumerate()
            .map(|(i, raw)| {
                self.convert(raw, element)
                    .map_err(|e| e.with_path(PathSegment::Index(i)))
            })
            .collect()
    }
}

/// Immutable update: fields the document doesn't supply keep the original's
/// values. Creator properties are left to the creator.
fn carry_over(
    descriptor: &ShapeDescriptor,
    original: &Record,
    obj: &Obj,
    doc: &dyn DocumentSource,
) {
    let from_creator = |name: &str| {
        descriptor
            .creator_slots()
            .iter()
            .any(|s| s.document_name() == Some(name))
    };
    let mut record = obj.write();
    for slot in descriptor.slots() {
        if slot.kind() != SlotKind::Field {
            continue;
        }
        let Some(name) = slot.document_name() else {
            continue;
        };
        if from_creator(name) || (!slot.is_transient() && doc.has(name)) {
            continue;
        }
        if let Some(value) = original.get(slot.name()) {
            record.set(slot.name(), value.clone());
        }
    }
}
