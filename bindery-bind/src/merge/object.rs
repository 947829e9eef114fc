use bindery_core::{Value, ValueKind};

use super::{MergeContext, MergeStrategy};
use crate::{BindError, RawValue};

/// Binds the incoming sub-document into the existing object.
///
/// Mutable objects are updated in place and keep their identity. Properties
/// of the existing object follow their own policies, so merges recurse.
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjectMerge;

impl MergeStrategy for ObjectMerge {
    fn merge(
        &self,
        existing: Value,
        incoming: RawValue,
        kind: &ValueKind,
        cx: &mut MergeContext<'_, '_>,
    ) -> Result<Value, BindError> {
        match existing {
            Value::Object(target) => cx.bind_into(&target, incoming).map(Value::Object),
            _ => cx.convert(incoming, kind),
        }
    }
}
