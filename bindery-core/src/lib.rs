#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

extern crate alloc;

mod error;
pub use error::*;

mod slot;
pub use slot::*;

mod raw;
pub use raw::*;

mod descriptor;
pub use descriptor::*;

mod provider;
pub use provider::*;

pub use bindery_value::{Obj, Opaque, Record, Value, ValueKind, ValueType};
