use bindery_core::{Value, ValueKind};

use super::{MergeContext, MergeStrategy};
use crate::{BindError, PathSegment, RawValue, SequenceMergeMode};

/// Combines sequences.
///
/// Appends by default. In [`SequenceMergeMode::IndexWise`] mode, incoming
/// elements overwrite the existing ones by position, merging into them where
/// the element kind allows, and the tail is appended.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequenceMerge {
    mode: Option<SequenceMergeMode>,
}

impl SequenceMerge {
    /// Always use `mode`, whatever the bind is configured with.
    pub fn with_mode(mode: SequenceMergeMode) -> Self {
        Self { mode: Some(mode) }
    }
}

impl MergeStrategy for SequenceMerge {
    fn merge(
        &self,
        existing: Value,
        incoming: RawValue,
        kind: &ValueKind,
        cx: &mut MergeContext<'_, '_>,
    ) -> Result<Value, BindError> {
        let (mut items, incoming) = match (existing, incoming) {
            (Value::Seq(items), RawValue::Array(incoming)) => (items, incoming),
            (_, incoming) => return cx.convert(incoming, kind),
        };
        let any = ValueKind::Any;
        let element = kind.element().unwrap_or(&any);
        let mode = self.mode.unwrap_or(cx.config().sequence_merge);

        for (i, raw) in incoming.into_iter().enumerate() {
            let at = |e: BindError| e.with_path(PathSegment::Index(i));
            let current = match mode {
                SequenceMergeMode::IndexWise => items.get(i).cloned(),
                SequenceMergeMode::Append => None,
            };
            match current {
                Some(current) => items[i] = cx.merge_or_convert(current, raw, element).map_err(at)?,
                None => items.push(cx.convert(raw, element).map_err(at)?),
            }
        }
        Ok(Value::Seq(items))
    }
}
