use bindery_core::{Nulls, Slot, SlotKind};

use crate::{BindConfig, BindErrorKind, MergeRegistry};

/// Effective null handling and merge behavior of one slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedPolicy {
    /// What an explicit null does
    pub nulls: Nulls,
    /// Non-null values merge into the current value instead of replacing it
    pub merge: bool,
}

/// Where a merge request came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Origin {
    Slot,
    Kind,
    Global,
}

/// Compute the policy of `slot`.
///
/// Null handling: slot, then the override for the slot's value kind, then the
/// global default, then [`Nulls::Set`].
///
/// Merge: requested by the slot, then the kind override, then the global
/// default; getter-only slots always request it. A request only takes effect
/// if `merges` has a strategy for the kind. Otherwise it degrades to replace,
/// unless [`BindConfig::strict_merge`] is set and the request came from the
/// slot or its kind, which is [`BindErrorKind::UnmergeableType`].
pub fn resolve_policy(
    slot: &Slot,
    config: &BindConfig,
    merges: &MergeRegistry,
) -> Result<ResolvedPolicy, BindErrorKind> {
    let kind = slot.value_kind();
    let over = config.kind_override(kind);

    let nulls = slot
        .nulls()
        .or_else(|| over.and_then(|o| o.nulls))
        .or(config.default_nulls)
        .unwrap_or(Nulls::Set);

    let requested = if slot.kind() == SlotKind::Getter {
        Some((true, Origin::Slot))
    } else {
        slot.merge()
            .map(|m| (m, Origin::Slot))
            .or_else(|| over.and_then(|o| o.mergeable).map(|m| (m, Origin::Kind)))
            .or_else(|| config.default_mergeable.map(|m| (m, Origin::Global)))
    };

    let merge = match requested {
        Some((true, origin)) => {
            if merges.strategy_for(kind).is_some() {
                true
            } else if config.strict_merge && origin != Origin::Global {
                return Err(BindErrorKind::UnmergeableType { kind: kind.clone() });
            } else {
                trace!(
                    slot = slot.name(),
                    %kind,
                    "merge requested but kind is unmergeable, replacing"
                );
                false
            }
        }
        _ => false,
    };

    Ok(ResolvedPolicy { nulls, merge })
}
