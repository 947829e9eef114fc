use bindery_bind::{
    BindConfig, BindErrorKind, BindTarget, EmptyInjectables, InjectKey, Opaque, StdInjectables,
    UnknownProperties, Value, ValueKind,
};
use bindery_testhelpers::IPanic;
use serde_json::json;

use super::fixtures::{any_object, binder};

#[test]
fn fields_and_setters_are_injected() -> Result<(), IPanic> {
    bindery_testhelpers::setup();
    let injectables = StdInjectables::new()
        .add_kind(ValueKind::String, "stuffValue")
        .add_named("myId", "xyz")
        .add_kind(ValueKind::Int, 37);

    let bean = binder().bind_value(
        "InjectedBean",
        json!({"value": 3}),
        BindTarget::New,
        &injectables,
    )?;

    assert_eq!(bean.get("value"), Some(Value::Int(3)));
    assert_eq!(bean.get("stuff"), Some(Value::from("stuffValue")));
    assert_eq!(bean.get("otherStuff"), Some(Value::from("xyz")));
    assert_eq!(bean.get("third"), Some(Value::Int(37)));
    Ok(())
}

#[test]
fn creator_mixes_injected_and_document_arguments() -> Result<(), IPanic> {
    bindery_testhelpers::setup();
    let injectables = StdInjectables::new().add_kind(ValueKind::String, "Bubba");

    let bean = binder().bind_value("CtorBean", json!({"age": 55}), BindTarget::New, &injectables)?;

    assert_eq!(bean.get("age"), Some(Value::Int(55)));
    assert_eq!(bean.get("name"), Some(Value::from("Bubba")));
    Ok(())
}

#[test]
fn creator_with_only_injected_arguments() -> Result<(), IPanic> {
    bindery_testhelpers::setup();
    let injectables = StdInjectables::new()
        .add_kind(ValueKind::String, "Bob")
        .add_named("number", 13);

    let bean = binder().bind_value("CtorBean2", json!({}), BindTarget::New, &injectables)?;

    assert_eq!(bean.get("age"), Some(Value::Int(13)));
    assert_eq!(bean.get("name"), Some(Value::from("Bob")));
    Ok(())
}

#[test]
fn transient_field_is_still_injected() -> Result<(), IPanic> {
    bindery_testhelpers::setup();
    let injected = Opaque::new(String::from("Injected!"));
    let injectables = StdInjectables::new().add_named("transient", injected.clone());

    let bean = binder().bind_value(
        "TransientBean",
        json!({"value": 28}),
        BindTarget::New,
        &injectables,
    )?;

    assert_eq!(bean.get("value"), Some(Value::Int(28)));
    let got = bean.get("injected").and_then(|v| v.as_opaque().cloned());
    assert!(got.is_some_and(|o| o.ptr_eq(&injected)));
    Ok(())
}

#[test]
fn transient_document_key_never_counts_as_unknown() -> Result<(), IPanic> {
    bindery_testhelpers::setup();
    let injected = Opaque::new(String::from("Injected!"));
    let injectables = StdInjectables::new().add_named("transient", injected.clone());
    let binder = binder()
        .with_config(BindConfig::default().with_unknown_properties(UnknownProperties::Fail));

    let bean = binder.bind_value(
        "TransientBean",
        json!({"value": 28, "injected": "from the document"}),
        BindTarget::New,
        &injectables,
    )?;

    assert_eq!(bean.get("value"), Some(Value::Int(28)));
    let got = bean.get("injected").and_then(|v| v.as_opaque().cloned());
    assert!(got.is_some_and(|o| o.ptr_eq(&injected)));
    Ok(())
}

#[test]
fn injected_values_keep_identity_across_interleaved_sources() -> Result<(), IPanic> {
    bindery_testhelpers::setup();
    let constructor_injected = Opaque::new(String::from("constructorInjected"));
    let method_injected = Opaque::new(String::from("methodInjected"));
    let field_injected = Opaque::new(String::from("fieldInjected"));
    let injectables = StdInjectables::new()
        .add_named("constructor_injected", constructor_injected.clone())
        .add_named("method_injected", method_injected.clone())
        .add_named("field_injected", field_injected.clone());

    let entries = [
        ("x", json!(13)),
        ("constructor_value", json!("constructor")),
        ("method_value", json!("method")),
        ("field_value", json!("field")),
    ];
    let orders: [[usize; 4]; 3] = [[0, 1, 2, 3], [3, 2, 1, 0], [2, 0, 3, 1]];

    let binder = binder();
    for order in orders {
        let doc: serde_json::Map<String, serde_json::Value> = order
            .iter()
            .map(|&i| (entries[i].0.to_owned(), entries[i].1.clone()))
            .collect();
        let bean = binder.bind_value(
            "InterleavedBean",
            serde_json::Value::Object(doc),
            BindTarget::New,
            &injectables,
        )?;

        let same = |field: &str, expected: &Opaque| {
            bean.get(field)
                .and_then(|v| v.as_opaque().cloned())
                .is_some_and(|o| o.ptr_eq(expected))
        };
        assert!(same("constructorInjected", &constructor_injected), "{order:?}");
        assert!(same("methodInjected", &method_injected), "{order:?}");
        assert!(same("fieldInjected", &field_injected), "{order:?}");

        assert_eq!(bean.get("constructorValue"), Some(Value::from("constructor")));
        assert_eq!(bean.get("methodValue"), Some(Value::from("method")));
        assert_eq!(bean.get("fieldValue"), Some(Value::from("field")));
        assert_eq!(bean.get("x"), Some(Value::Int(13)));
    }
    Ok(())
}

#[test]
fn missing_injectable_never_falls_back_to_the_document() {
    bindery_testhelpers::setup();
    let injectables = StdInjectables::new()
        .add_kind(ValueKind::String, "stuffValue")
        .add_kind(ValueKind::Int, 37);

    let err = binder()
        .bind_value(
            "InjectedBean",
            json!({"value": 3, "otherStuff": "from the document"}),
            BindTarget::New,
            &injectables,
        )
        .unwrap_err();

    match &err.kind {
        BindErrorKind::MissingInjectable { key } => {
            assert_eq!(key, &InjectKey::Name("myId".into()));
        }
        other => panic!("expected a missing injectable, got {other:?}"),
    }
    let slot = err.slot.as_ref().map(|s| s.name.as_ref());
    assert_eq!(slot, Some("otherStuff"));
}

#[test]
fn injected_creator_argument_without_provider_value() {
    bindery_testhelpers::setup();
    let err = binder()
        .bind_value("CtorBean", json!({"age": 1}), BindTarget::New, &EmptyInjectables)
        .unwrap_err();
    assert!(matches!(err.kind, BindErrorKind::MissingInjectable { .. }));
}

#[test]
fn concurrent_binds_share_descriptors_and_injectables() {
    bindery_testhelpers::setup();
    let binder = binder();
    let conn = Opaque::new(String::from("shared"));
    let injectables = StdInjectables::new()
        .add_named("transient", conn.clone())
        .add_kind(any_object(), conn.clone());

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8_i64)
            .map(|i| {
                let binder = &binder;
                let injectables = &injectables;
                s.spawn(move || {
                    binder.bind_value(
                        "TransientBean",
                        json!({"value": i}),
                        BindTarget::New,
                        injectables,
                    )
                })
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let bean = handle.join().unwrap().unwrap();
            assert_eq!(bean.get("value"), Some(Value::Int(i as i64)));
            let injected = bean.get("injected").and_then(|v| v.as_opaque().cloned());
            assert!(injected.is_some_and(|o| o.ptr_eq(&conn)));
        }
    });
}
