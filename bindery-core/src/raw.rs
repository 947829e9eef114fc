//! Raw shape metadata, as produced by a discovery mechanism.
//!
//! Nothing here is validated. [`ShapeDescriptor::build`](crate::ShapeDescriptor::build)
//! checks the metadata and turns it into slots.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use bindery_value::{Record, Value, ValueKind};

use crate::{CreatorFn, GetterFn, Nulls, SetterFn};

/// Injection annotation on a parameter or member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inject {
    /// Look the value up by the declared value kind
    ByKind,
    /// Look the value up by an explicit name
    Named(String),
}

/// Visibility of a creator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    /// Selectable without an explicit marker
    Public,
    /// Only selectable when explicitly marked
    Private,
}

/// A creator parameter.
#[derive(Clone, Debug)]
pub struct RawParam {
    /// Name in the source declaration
    pub declared: Option<String>,
    /// Explicit document property name
    pub property: Option<String>,
    /// Injection annotation
    pub inject: Option<Inject>,
    /// Declared value kind
    pub value_kind: ValueKind,
    /// Absence is an error
    pub required: bool,
    /// Null handling override
    pub nulls: Option<Nulls>,
}

impl RawParam {
    /// A parameter bound from the document property `name`.
    pub fn property(name: impl Into<String>, value_kind: ValueKind) -> Self {
        Self {
            declared: None,
            property: Some(name.into()),
            inject: None,
            value_kind,
            required: false,
            nulls: None,
        }
    }

    /// A parameter injected by its value kind.
    pub fn injected(value_kind: ValueKind) -> Self {
        Self {
            declared: None,
            property: None,
            inject: Some(Inject::ByKind),
            value_kind,
            required: false,
            nulls: None,
        }
    }

    /// A parameter injected by explicit name.
    pub fn injected_named(name: impl Into<String>, value_kind: ValueKind) -> Self {
        Self {
            inject: Some(Inject::Named(name.into())),
            ..Self::injected(value_kind)
        }
    }

    /// Set the name used in the source declaration.
    pub fn declared_as(mut self, name: impl Into<String>) -> Self {
        self.declared = Some(name.into());
        self
    }

    /// Add an explicit document property name.
    pub fn with_property(mut self, name: impl Into<String>) -> Self {
        self.property = Some(name.into());
        self
    }

    /// Mark the parameter as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Override null handling for this parameter.
    pub fn nulls(mut self, nulls: Nulls) -> Self {
        self.nulls = Some(nulls);
        self
    }
}

/// A constructor-like function that can create instances of a type.
#[derive(Clone)]
pub struct RawCreator {
    /// Explicitly marked as the creator to use
    pub explicit: bool,
    /// Visibility of the creator
    pub visibility: Visibility,
    /// Parameters, in ordinal order
    pub params: Vec<RawParam>,
    /// The function itself
    pub func: CreatorFn,
}

impl RawCreator {
    /// A public creator.
    pub fn public<F>(params: Vec<RawParam>, func: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Record, String> + Send + Sync + 'static,
    {
        Self {
            explicit: false,
            visibility: Visibility::Public,
            params,
            func: Arc::new(func),
        }
    }

    /// A private creator, only usable once [marked](RawCreator::marked).
    pub fn private<F>(params: Vec<RawParam>, func: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Record, String> + Send + Sync + 'static,
    {
        Self {
            visibility: Visibility::Private,
            ..Self::public(params, func)
        }
    }

    /// Mark this creator as the one to use.
    pub fn marked(mut self) -> Self {
        self.explicit = true;
        self
    }
}

impl fmt::Debug for RawCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawCreator")
            .field("explicit", &self.explicit)
            .field("visibility", &self.visibility)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Kind of a non-creator member.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberKind {
    /// Field
    Field,
    /// Setter method
    Setter,
    /// Getter without a setter
    Getter,
}

/// A field, setter or getter of a type.
#[derive(Clone)]
pub struct RawMember {
    /// Declared name
    pub name: String,
    /// Kind of member
    pub kind: MemberKind,
    /// Declared value kind
    pub value_kind: ValueKind,
    /// Explicit document property name
    pub rename: Option<String>,
    /// Injection annotation
    pub inject: Option<Inject>,
    /// Merge annotation
    pub merge: Option<bool>,
    /// Null handling override
    pub nulls: Option<Nulls>,
    /// Excluded from the document
    pub transient: bool,
    /// Setter function, for setters
    pub setter: Option<SetterFn>,
    /// Getter function, for getters and setters that can be read back
    pub getter: Option<GetterFn>,
}

impl RawMember {
    /// A plain field.
    pub fn field(name: impl Into<String>, value_kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Field,
            value_kind,
            rename: None,
            inject: None,
            merge: None,
            nulls: None,
            transient: false,
            setter: None,
            getter: None,
        }
    }

    /// A setter method.
    pub fn setter<F>(name: impl Into<String>, value_kind: ValueKind, set: F) -> Self
    where
        F: Fn(&mut Record, Value) -> Result<(), String> + Send + Sync + 'static,
    {
        Self {
            kind: MemberKind::Setter,
            setter: Some(Arc::new(set)),
            ..Self::field(name, value_kind)
        }
    }

    /// A getter with no setter.
    pub fn getter<F>(name: impl Into<String>, value_kind: ValueKind, get: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        Self {
            kind: MemberKind::Getter,
            getter: Some(Arc::new(get)),
            ..Self::field(name, value_kind)
        }
    }

    /// Pair a setter with a getter so its current value can be merged into.
    pub fn with_getter<F>(mut self, get: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        self.getter = Some(Arc::new(get));
        self
    }

    /// Bind from a differently named document property.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }

    /// Inject by declared value kind.
    pub fn inject(mut self) -> Self {
        self.inject = Some(Inject::ByKind);
        self
    }

    /// Inject by explicit name.
    pub fn inject_named(mut self, name: impl Into<String>) -> Self {
        self.inject = Some(Inject::Named(name.into()));
        self
    }

    /// Request merge-on-update.
    pub fn merge(mut self) -> Self {
        self.merge = Some(true);
        self
    }

    /// Explicitly opt out of merge-on-update.
    pub fn no_merge(mut self) -> Self {
        self.merge = Some(false);
        self
    }

    /// Override null handling.
    pub fn nulls(mut self, nulls: Nulls) -> Self {
        self.nulls = Some(nulls);
        self
    }

    /// Exclude from the document.
    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }
}

impl fmt::Debug for RawMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawMember")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("value_kind", &self.value_kind)
            .field("rename", &self.rename)
            .field("inject", &self.inject)
            .field("merge", &self.merge)
            .field("nulls", &self.nulls)
            .field("transient", &self.transient)
            .finish_non_exhaustive()
    }
}

/// Everything discovery knows about a type.
#[derive(Clone, Debug)]
pub struct RawShape {
    /// Type name
    pub name: Arc<str>,
    /// Instances can be updated in place
    pub mutable: bool,
    /// Candidate creators
    pub creators: Vec<RawCreator>,
    /// Fields, setters and getters, in declaration order
    pub members: Vec<RawMember>,
}

impl RawShape {
    /// A mutable type with no creators or members yet.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            mutable: true,
            creators: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Instances can't be updated in place; updates construct a replacement.
    pub fn immutable(mut self) -> Self {
        self.mutable = false;
        self
    }

    /// Add a creator.
    pub fn creator(mut self, creator: RawCreator) -> Self {
        self.creators.push(creator);
        self
    }

    /// Add a public no-argument creator producing an empty instance.
    pub fn default_creator(self) -> Self {
        let name = self.name.clone();
        self.creator(RawCreator::public(Vec::new(), move |_| {
            Ok(Record::new(name.clone()))
        }))
    }

    /// Add a member.
    pub fn member(mut self, member: RawMember) -> Self {
        self.members.push(member);
        self
    }
}
