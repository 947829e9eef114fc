use bindery_core::{Value, ValueKind};

use super::{MergeContext, MergeStrategy};
use crate::{BindError, PathSegment, RawValue};

/// Union of sets by equality, existing elements first.
#[derive(Clone, Copy, Debug, Default)]
pub struct SetMerge;

impl MergeStrategy for SetMerge {
    fn merge(
        &self,
        existing: Value,
        incoming: RawValue,
        kind: &ValueKind,
        cx: &mut MergeContext<'_, '_>,
    ) -> Result<Value, BindError> {
        let (items, incoming) = match (existing, incoming) {
            (Value::Set(items), RawValue::Array(incoming)) => (items, incoming),
            (_, incoming) => return cx.convert(incoming, kind),
        };
        let any = ValueKind::Any;
        let element = kind.element().unwrap_or(&any);

        let mut added = Vec::with_capacity(incoming.len());
        for (i, raw) in incoming.into_iter().enumerate() {
            added.push(
                cx.convert(raw, element)
                    .map_err(|e| e.with_path(PathSegment::Index(i)))?,
            );
        }
        Ok(Value::set_from(items.into_iter().chain(added)))
    }
}
