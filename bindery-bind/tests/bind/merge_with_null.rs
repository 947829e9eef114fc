use bindery_bind::{
    BindConfig, BindTarget, Binder, EmptyInjectables, KindOverride, Nulls, Obj, Value,
};
use bindery_testhelpers::IPanic;
use serde_json::json;

use super::fixtures::{ab, ab_kind, ab_of, binder, config};

fn update(binder: &Binder, target: Obj, doc: serde_json::Value) -> Result<Obj, IPanic> {
    Ok(binder.bind_value(
        &target.type_name(),
        doc,
        BindTarget::Update(target.clone()),
        &EmptyInjectables,
    )?)
}

#[test]
fn null_overwrites_mergeable_object_by_default() -> Result<(), IPanic> {
    bindery_testhelpers::setup();
    let target = config("ConfigDefault", ab(5, 7));
    let result = update(&binder(), target.clone(), json!({"loc": null}))?;

    assert!(result.ptr_eq(&target));
    assert_eq!(result.get("loc"), Some(Value::Null));
    Ok(())
}

#[test]
fn kind_override_skips_null() -> Result<(), IPanic> {
    bindery_testhelpers::setup();
    let binder = binder().with_config(
        BindConfig::default()
            .with_kind_override(ab_kind(), KindOverride::default().nulls(Nulls::Skip)),
    );
    let target = config("ConfigDefault", ab(137, -3));
    let result = update(&binder, target, json!({"loc": null}))?;

    assert_eq!(result.get("loc").as_ref().and_then(ab_of), Some((137, -3)));
    Ok(())
}

#[test]
fn global_default_skips_null() -> Result<(), IPanic> {
    bindery_testhelpers::setup();
    let binder = binder().with_config(BindConfig::default().with_default_nulls(Nulls::Skip));
    let target = config("ConfigDefault", ab(12, 34));
    let result = update(&binder, target, json!({"loc": null}))?;

    assert_eq!(result.get("loc").as_ref().and_then(ab_of), Some((12, 34)));
    Ok(())
}

#[test]
fn slot_skip_leaves_value_untouched() -> Result<(), IPanic> {
    bindery_testhelpers::setup();
    let loc = ab(5, 7);
    let target = config("ConfigSkipNull", loc.clone());
    let result = update(&binder(), target, json!({"loc": null}))?;

    let kept = result.get("loc");
    assert_eq!(kept.as_ref().and_then(ab_of), Some((5, 7)));
    assert!(kept.and_then(|v| v.as_object().cloned()).is_some_and(|o| o.ptr_eq(&loc)));
    Ok(())
}

#[test]
fn slot_skip_is_idempotent() -> Result<(), IPanic> {
    bindery_testhelpers::setup();
    let binder = binder();
    let target = config("ConfigSkipNull", ab(5, 7));
    for _ in 0..3 {
        update(&binder, target.clone(), json!({"loc": null}))?;
    }
    assert_eq!(target.get("loc").as_ref().and_then(ab_of), Some((5, 7)));
    Ok(())
}

#[test]
fn slot_set_wins_over_kind_and_global_skip() -> Result<(), IPanic> {
    bindery_testhelpers::setup();
    let binder = binder().with_config(
        BindConfig::default()
            .with_default_nulls(Nulls::Skip)
            .with_kind_override(ab_kind(), KindOverride::default().nulls(Nulls::Skip)),
    );
    let target = config("ConfigAllowNullOverwrite", ab(5, 7));
    let result = update(&binder, target, json!({"loc": null}))?;

    assert_eq!(result.get("loc"), Some(Value::Null));
    Ok(())
}

#[test]
fn slot_skip_wins_over_kind_set() -> Result<(), IPanic> {
    bindery_testhelpers::setup();
    let binder = binder().with_config(
        BindConfig::default()
            .with_kind_override(ab_kind(), KindOverride::default().nulls(Nulls::Set)),
    );
    let target = config("ConfigSkipNull", ab(5, 7));
    let result = update(&binder, target, json!({"loc": null}))?;

    assert_eq!(result.get("loc").as_ref().and_then(ab_of), Some((5, 7)));
    Ok(())
}

#[test]
fn non_null_merges_into_existing_object() -> Result<(), IPanic> {
    bindery_testhelpers::setup();
    let loc = ab(5, 7);
    let target = config("ConfigDefault", loc.clone());
    let result = update(&binder(), target, json!({"loc": {"b": 70}}))?;

    let merged = result.get("loc");
    assert_eq!(merged.as_ref().and_then(ab_of), Some((5, 70)));
    assert!(merged.and_then(|v| v.as_object().cloned()).is_some_and(|o| o.ptr_eq(&loc)));
    Ok(())
}

#[test]
fn getter_only_slot_ignores_null() -> Result<(), IPanic> {
    bindery_testhelpers::setup();
    let binder = binder();
    let input =
        binder.bind_value("NoSetterConfig", json!({}), BindTarget::New, &EmptyInjectables)?;
    let result = update(&binder, input.clone(), json!({"value": null}))?;

    assert!(result.ptr_eq(&input));
    assert_eq!(result.get("_value").as_ref().and_then(ab_of), Some((2, 3)));
    Ok(())
}

#[test]
fn getter_only_slot_merges_in_place() -> Result<(), IPanic> {
    bindery_testhelpers::setup();
    let binder = binder();
    let input =
        binder.bind_value("NoSetterConfig", json!({}), BindTarget::New, &EmptyInjectables)?;
    let inner = input.get("_value").and_then(|v| v.as_object().cloned());

    let result = update(&binder, input.clone(), json!({"value": {"a": 20}}))?;

    let value = result.get("_value");
    assert_eq!(value.as_ref().and_then(ab_of), Some((20, 3)));
    let now = value.and_then(|v| v.as_object().cloned());
    assert!(matches!((inner, now), (Some(a), Some(b)) if a.ptr_eq(&b)));
    Ok(())
}
