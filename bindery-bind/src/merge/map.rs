use bindery_core::{Value, ValueKind};

use super::{MergeContext, MergeStrategy};
use crate::{BindError, PathSegment, RawValue};

/// Key-wise map merge.
///
/// Keys on both sides are merged when the element kind has a strategy and
/// replaced otherwise. New keys are appended. An explicit null entry
/// overwrites.
#[derive(Clone, Copy, Debug, Default)]
pub struct MapMerge;

impl MergeStrategy for MapMerge {
    fn merge(
        &self,
        existing: Value,
        incoming: RawValue,
        kind: &ValueKind,
        cx: &mut MergeContext<'_, '_>,
    ) -> Result<Value, BindError> {
        let (mut entries, incoming) = match (existing, incoming) {
            (Value::Map(entries), RawValue::Object(incoming)) => (entries, incoming),
            (_, incoming) => return cx.convert(incoming, kind),
        };
        let any = ValueKind::Any;
        let element = kind.element().unwrap_or(&any);

        for (key, raw) in incoming {
            let current = entries.get(&key).cloned().unwrap_or_default();
            let value = cx
                .merge_or_convert(current, raw, element)
                .map_err(|e| e.with_path(PathSegment::Key(key.clone())))?;
            entries.insert(key, value);
        }
        Ok(Value::Map(entries))
    }
}
