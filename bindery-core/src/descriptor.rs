use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use bindery_value::{Record, Value};

use crate::{
    BindingSource, CreatorFn, Inject, InjectKey, MemberKind, RawCreator, RawMember, RawParam,
    RawShape, ShapeError, Slot, SlotKind, Visibility,
};

/// The bindable slots of a type, built once from its [`RawShape`].
///
/// Immutable after construction and shared across concurrent binds.
#[derive(Clone)]
pub struct ShapeDescriptor {
    type_name: Arc<str>,
    mutable: bool,
    creator: CreatorFn,
    creator_slots: Vec<Slot>,
    slots: Vec<Slot>,
}

impl ShapeDescriptor {
    /// Select a creator and turn every parameter and member into a slot.
    pub fn build(raw: RawShape) -> Result<Self, ShapeError> {
        let creator = select_creator(&raw)?;

        let creator_slots = creator
            .params
            .iter()
            .enumerate()
            .map(|(ordinal, param)| param_slot(&raw.name, ordinal, param))
            .collect::<Result<Vec<_>, _>>()?;
        ensure_unique(&raw.name, &creator_slots, "creator parameters")?;

        // fields first, then setters and getters, each group in declaration order
        let (fields, methods): (Vec<&RawMember>, Vec<&RawMember>) = raw
            .members
            .iter()
            .partition(|m| m.kind == MemberKind::Field);
        let slots = fields
            .into_iter()
            .chain(methods)
            .map(|member| member_slot(&raw.name, member))
            .collect::<Result<Vec<_>, _>>()?;
        let document_slots: Vec<Slot> = slots.iter().filter(|s| !s.transient).cloned().collect();
        ensure_unique(&raw.name, &document_slots, "members")?;

        Ok(Self {
            creator: creator.func.clone(),
            type_name: raw.name,
            mutable: raw.mutable,
            creator_slots,
            slots,
        })
    }

    /// Name of the described type.
    pub fn type_name(&self) -> &Arc<str> {
        &self.type_name
    }

    /// Instances can be updated in place.
    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Parameter slots of the selected creator, in ordinal order.
    pub fn creator_slots(&self) -> &[Slot] {
        &self.creator_slots
    }

    /// Remaining slots: fields, then setters and getters.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Look up a remaining slot by declared name.
    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.name() == name)
    }

    /// Run the selected creator.
    pub fn construct(&self, args: Vec<Value>) -> Result<Record, String> {
        (self.creator)(args)
    }
}

impl fmt::Debug for ShapeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeDescriptor")
            .field("type_name", &self.type_name)
            .field("mutable", &self.mutable)
            .field("creator_slots", &self.creator_slots)
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}

/// An explicitly marked creator wins; otherwise the single public one.
/// Ambiguity is reported, never guessed around.
fn select_creator(raw: &RawShape) -> Result<&RawCreator, ShapeError> {
    let marked: Vec<&RawCreator> = raw.creators.iter().filter(|c| c.explicit).collect();
    match marked.as_slice() {
        [only] => return Ok(*only),
        [] => {}
        many => {
            return Err(ShapeError::ConstructorAmbiguity {
                type_name: raw.name.as_ref().into(),
                candidates: many.len(),
            });
        }
    }

    let public: Vec<&RawCreator> = raw
        .creators
        .iter()
        .filter(|c| c.visibility == Visibility::Public)
        .collect();
    match public.as_slice() {
        [only] => Ok(*only),
        [] => Err(ShapeError::unboundable(
            &raw.name,
            "no marked or public creator",
        )),
        many => Err(ShapeError::ConstructorAmbiguity {
            type_name: raw.name.as_ref().into(),
            candidates: many.len(),
        }),
    }
}

fn param_slot(type_name: &str, ordinal: usize, param: &RawParam) -> Result<Slot, ShapeError> {
    let source = match (&param.inject, &param.property, &param.declared) {
        (Some(_), Some(property), _) => {
            return Err(ShapeError::unboundable(
                type_name,
                format!(
                    "creator parameter #{ordinal} is injected and bound to property `{property}`"
                ),
            ));
        }
        (Some(inject), None, _) => BindingSource::Injected(inject_key(inject, param)),
        (None, Some(property), _) | (None, None, Some(property)) => {
            BindingSource::Document(property.clone())
        }
        (None, None, None) => {
            return Err(ShapeError::unboundable(
                type_name,
                format!("creator parameter #{ordinal} has no name and is not injected"),
            ));
        }
    };

    let name = param
        .declared
        .clone()
        .or_else(|| param.property.clone())
        .or_else(|| match &param.inject {
            Some(Inject::Named(n)) => Some(n.clone()),
            _ => None,
        })
        .unwrap_or_else(|| format!("arg{ordinal}"));

    Ok(Slot {
        name: name.into(),
        kind: SlotKind::CreatorParam { ordinal },
        source,
        value_kind: param.value_kind.clone(),
        merge: None,
        nulls: param.nulls,
        required: param.required,
        transient: false,
        setter: None,
        getter: None,
    })
}

fn member_slot(type_name: &str, member: &RawMember) -> Result<Slot, ShapeError> {
    let kind = match member.kind {
        MemberKind::Field => SlotKind::Field,
        MemberKind::Setter if member.setter.is_none() => {
            return Err(ShapeError::unboundable(
                type_name,
                format!("setter `{}` has no setter function", member.name),
            ));
        }
        MemberKind::Setter => SlotKind::Setter,
        MemberKind::Getter if member.getter.is_none() => {
            return Err(ShapeError::unboundable(
                type_name,
                format!("getter `{}` has no getter function", member.name),
            ));
        }
        MemberKind::Getter => SlotKind::Getter,
    };

    let source = match (&member.inject, &member.rename) {
        (Some(_), Some(rename)) => {
            return Err(ShapeError::unboundable(
                type_name,
                format!(
                    "`{}` is injected and bound to property `{rename}`",
                    member.name
                ),
            ));
        }
        (Some(_), None) if kind == SlotKind::Getter => {
            return Err(ShapeError::unboundable(
                type_name,
                format!("getter-only `{}` cannot be injected", member.name),
            ));
        }
        (Some(Inject::ByKind), None) => {
            BindingSource::Injected(InjectKey::Kind(member.value_kind.clone()))
        }
        (Some(Inject::Named(n)), None) => BindingSource::Injected(InjectKey::Name(n.clone())),
        (None, rename) => {
            BindingSource::Document(rename.clone().unwrap_or_else(|| member.name.clone()))
        }
    };

    Ok(Slot {
        name: member.name.as_str().into(),
        kind,
        source,
        value_kind: member.value_kind.clone(),
        merge: member.merge,
        nulls: member.nulls,
        required: false,
        transient: member.transient,
        setter: member.setter.clone(),
        getter: member.getter.clone(),
    })
}

fn inject_key(inject: &Inject, param: &RawParam) -> InjectKey {
    match inject {
        Inject::ByKind => InjectKey::Kind(param.value_kind.clone()),
        Inject::Named(name) => InjectKey::Name(name.clone()),
    }
}

fn ensure_unique(type_name: &str, slots: &[Slot], what: &str) -> Result<(), ShapeError> {
    for (i, slot) in slots.iter().enumerate() {
        let Some(name) = slot.document_name() else {
            continue;
        };
        if slots[..i].iter().any(|s| s.document_name() == Some(name)) {
            return Err(ShapeError::unboundable(
                type_name,
                format!("property `{name}` is bound by more than one of its {what}"),
            ));
        }
    }
    Ok(())
}
