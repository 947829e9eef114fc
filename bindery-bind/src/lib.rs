#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

extern crate alloc;

#[macro_use]
mod tracing_macros;

mod config;
pub use config::*;

mod error;
pub use error::*;

mod document;
pub use document::{DocumentSource, MapDocument, RawValue};

mod coerce;
pub use coerce::*;

mod inject;
pub use inject::*;

mod cache;
pub use cache::*;

mod policy;
pub use policy::*;

mod binder;
pub use binder::{BindTarget, Binder};

mod merge;
pub use merge::*;

pub use bindery_core::{
    InjectKey, Nulls, Obj, Opaque, RawCreator, RawMember, RawParam, RawShape, Record,
    ShapeDescriptor, ShapeError, ShapeProvider, ShapeRegistry, Slot, SlotKind, Value, ValueKind,
};
