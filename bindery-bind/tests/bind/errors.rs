use core::error::Error as _;

use bindery_bind::{
    BindConfig, BindError, BindErrorKind, BindTarget, Binder, EmptyInjectables, MergeRegistry, Obj,
    RawCreator, RawShape, Record, ShapeError, ShapeRegistry, UnknownProperties, Value,
};
use insta::assert_snapshot;
use serde_json::json;

use super::fixtures::{ab, ab_of, binder, config, registry};

fn bind_new(binder: &Binder, type_name: &str, doc: serde_json::Value) -> BindError {
    binder
        .bind_value(type_name, doc, BindTarget::New, &EmptyInjectables)
        .unwrap_err()
}

fn bind_update(binder: &Binder, target: &Obj, doc: serde_json::Value) -> BindError {
    binder
        .bind_value(
            &target.type_name(),
            doc,
            BindTarget::Update(target.clone()),
            &EmptyInjectables,
        )
        .unwrap_err()
}

#[test]
fn unknown_properties_policy() {
    bindery_testhelpers::setup();
    let doc = json!({"a": 1, "c": 2});

    for policy in [UnknownProperties::Ignore, UnknownProperties::Warn] {
        let binder = binder().with_config(BindConfig::default().with_unknown_properties(policy));
        let ab = binder.bind_value("AB", doc.clone(), BindTarget::New, &EmptyInjectables);
        assert!(ab.is_ok_and(|ab| ab.get("c").is_none()));
    }

    let strict = binder()
        .with_config(BindConfig::default().with_unknown_properties(UnknownProperties::Fail));
    let err = bind_new(&strict, "AB", doc);
    assert_snapshot!(err.to_string(), @"unknown property `c`");
}

#[test]
fn nested_errors_carry_the_full_path() {
    bindery_testhelpers::setup();
    let err = bind_new(&binder(), "Catalog", json!({"children": {"k": {"a": "x"}}}));
    assert_snapshot!(
        err.to_string(),
        @r#"at children["k"].a: invalid int: "x": invalid digit found in string (field `a` of `AB`)"#
    );

    let err = bind_new(&binder(), "Catalog", json!({"items": [{"a": 1}, {"b": true}]}));
    assert_snapshot!(
        err.to_string(),
        @"at items[1].b: type mismatch: expected int, got bool (field `b` of `AB`)"
    );
}

#[test]
fn container_type_mismatch() {
    bindery_testhelpers::setup();
    let err = bind_new(&binder(), "Catalog", json!({"tags": 5}));
    assert_snapshot!(
        err.to_string(),
        @"at tags: type mismatch: expected seq<string>, got number (field `tags` of `Catalog`)"
    );
}

#[test]
fn shape_errors_surface_and_are_sources() {
    bindery_testhelpers::setup();
    let err = bind_new(&binder(), "Nope", json!({}));
    assert_snapshot!(err.to_string(), @"type `Nope` cannot be bound: no shape is known for it");
    assert!(err.source().is_some());

    let twice = RawShape::new("Twice")
        .default_creator()
        .creator(RawCreator::public(vec![], |_| Ok(Record::new("Twice"))));
    let binder = Binder::new(ShapeRegistry::new().with(twice));
    let err = bind_new(&binder, "Twice", json!({}));
    assert!(matches!(
        err.kind,
        BindErrorKind::Shape(ShapeError::ConstructorAmbiguity { candidates: 2, .. })
    ));
    assert_snapshot!(err.to_string(), @"type `Twice` has 2 candidate creators and none is marked");
}

#[test]
fn creator_failure() {
    bindery_testhelpers::setup();
    let fails = RawShape::new("Fails").creator(RawCreator::public(vec![], |_| Err("boom".into())));
    let binder = Binder::new(ShapeRegistry::new().with(fails));
    assert_snapshot!(bind_new(&binder, "Fails", json!({})).to_string(), @"creator failed: boom");
}

#[test]
fn strict_merge_rejects_unmergeable_requests() {
    bindery_testhelpers::setup();
    let binder = Binder::new(registry())
        .with_merges(MergeRegistry::empty())
        .with_config(BindConfig::default().with_strict_merge(true));
    let target = Obj::new(Record::new("Catalog").with("tags", Value::Seq(vec![])));

    let err = bind_update(&binder, &target, json!({"tags": ["x"]}));
    assert_snapshot!(
        err.to_string(),
        @"cannot merge values of kind `seq<string>` (field `tags` of `Catalog`)"
    );

    // without strict merge the same request degrades to replace
    let lenient = binder.with_config(BindConfig::default());
    let updated = lenient.bind_value(
        "Catalog",
        json!({"tags": ["x"]}),
        BindTarget::Update(target.clone()),
        &EmptyInjectables,
    );
    assert!(updated.is_ok());
    assert_eq!(target.get("tags"), Some(Value::Seq(vec![Value::from("x")])));
}

#[test]
fn getter_only_slot_cannot_be_replaced() {
    bindery_testhelpers::setup();
    let target = Obj::new(Record::new("NoSetterConfig"));
    let err = bind_update(&binder(), &target, json!({"value": {"a": 1}}));
    assert_snapshot!(
        err.to_string(),
        @"at value: getter-only slot can only be merged into (getter `value` of `NoSetterConfig`)"
    );
}

#[test]
fn nesting_depth_is_bounded() {
    bindery_testhelpers::setup();
    let binder = binder().with_config(BindConfig::default().with_max_depth(3));
    let doc = json!({"next": {"next": {"name": "ok"}}});
    assert!(
        binder
            .bind_value("Node", doc, BindTarget::New, &EmptyInjectables)
            .is_ok()
    );

    let err = bind_new(
        &binder,
        "Node",
        json!({"next": {"next": {"next": {"name": "too deep"}}}}),
    );
    assert_snapshot!(
        err.to_string(),
        @"at next.next.next: objects nest deeper than 3 levels (field `next` of `Node`)"
    );
}

#[test]
fn non_object_documents_are_rejected() {
    bindery_testhelpers::setup();
    let err = bind_new(&binder(), "AB", json!([1, 2]));
    assert_snapshot!(err.to_string(), @"type mismatch: expected AB, got array");
}

#[test]
fn update_target_must_match_the_bound_type() {
    bindery_testhelpers::setup();
    let target = config("ConfigDefault", ab(5, 7));
    let err = binder()
        .bind_value(
            "AB",
            json!({"a": 99}),
            BindTarget::Update(target.clone()),
            &EmptyInjectables,
        )
        .unwrap_err();

    assert!(matches!(err.kind, BindErrorKind::TargetMismatch { .. }));
    assert_snapshot!(err.to_string(), @"cannot update a `ConfigDefault` as a `AB`");
    assert_eq!(target.get("a"), None);
    assert_eq!(target.get("loc").as_ref().and_then(ab_of), Some((5, 7)));
}
