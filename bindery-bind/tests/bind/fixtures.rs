//! Shapes shared by the integration tests.

use bindery_bind::{
    Binder, Nulls, Obj, RawCreator, RawMember, RawParam, RawShape, Record, ShapeRegistry, Value,
    ValueKind,
};

pub fn ab_kind() -> ValueKind {
    ValueKind::object("AB")
}

/// A plain mutable pair of ints.
pub fn ab_shape() -> RawShape {
    RawShape::new("AB")
        .creator(RawCreator::public(vec![], |_| {
            Ok(Record::new("AB").with("a", 0).with("b", 0))
        }))
        .member(RawMember::field("a", ValueKind::Int))
        .member(RawMember::field("b", ValueKind::Int))
}

pub fn ab(a: i64, b: i64) -> Obj {
    Obj::new(Record::new("AB").with("a", a).with("b", b))
}

pub fn ab_of(value: &Value) -> Option<(i64, i64)> {
    let obj = value.as_object()?;
    Some((obj.get("a")?.as_i64()?, obj.get("b")?.as_i64()?))
}

fn config_shape(name: &'static str, loc: RawMember) -> RawShape {
    RawShape::new(name)
        .creator(RawCreator::public(vec![], move |_| {
            Ok(Record::new(name).with("loc", ab(1, 2)))
        }))
        .member(loc)
}

/// Instance of one of the `Config*` shapes holding `loc`.
pub fn config(name: &str, loc: Obj) -> Obj {
    Obj::new(Record::new(name).with("loc", loc))
}

/// `value` is only reachable through a getter.
fn no_setter_shape() -> RawShape {
    RawShape::new("NoSetterConfig")
        .creator(RawCreator::public(vec![], |_| {
            Ok(Record::new("NoSetterConfig").with("_value", ab(2, 3)))
        }))
        .member(
            RawMember::getter("value", ab_kind(), |r| {
                r.get("_value").cloned().unwrap_or_default()
            })
            .merge(),
        )
}

fn injected_bean() -> RawShape {
    RawShape::new("InjectedBean")
        .default_creator()
        .member(RawMember::field("stuff", ValueKind::String).inject())
        .member(RawMember::field("otherStuff", ValueKind::String).inject_named("myId"))
        .member(RawMember::field("value", ValueKind::Int))
        .member(
            RawMember::setter("injectThird", ValueKind::Int, |r, v| {
                r.set("third", v);
                Ok(())
            })
            .inject(),
        )
}

fn ctor_bean() -> RawShape {
    RawShape::new("CtorBean").creator(RawCreator::public(
        vec![
            RawParam::injected(ValueKind::String).declared_as("n"),
            RawParam::property("age", ValueKind::Int).declared_as("a"),
        ],
        |args| {
            let mut args = args.into_iter();
            Ok(Record::new("CtorBean")
                .with("name", args.next().unwrap_or_default())
                .with("age", args.next().unwrap_or_default()))
        },
    ))
}

fn ctor_bean2() -> RawShape {
    RawShape::new("CtorBean2").creator(RawCreator::public(
        vec![
            RawParam::injected(ValueKind::String).declared_as("n"),
            RawParam::injected_named("number", ValueKind::Int).declared_as("a"),
        ],
        |args| {
            let mut args = args.into_iter();
            Ok(Record::new("CtorBean2")
                .with("name", args.next().unwrap_or_default())
                .with("age", args.next().unwrap_or_default()))
        },
    ))
}

pub fn any_object() -> ValueKind {
    ValueKind::opaque("Object")
}

/// Injected and document-sourced slots interleaved in every position.
fn interleaved_bean() -> RawShape {
    RawShape::new("InterleavedBean")
        .creator(RawCreator::public(vec![], |_| {
            Err("the marked creator must be used".into())
        }))
        .creator(
            RawCreator::private(
                vec![
                    RawParam::injected_named("constructor_injected", any_object()),
                    RawParam::property("constructor_value", ValueKind::String),
                ],
                |args| {
                    let mut args = args.into_iter();
                    Ok(Record::new("InterleavedBean")
                        .with("constructorInjected", args.next().unwrap_or_default())
                        .with("constructorValue", args.next().unwrap_or_default()))
                },
            )
            .marked(),
        )
        .member(RawMember::field("fieldInjected", any_object()).inject_named("field_injected"))
        .member(RawMember::field("fieldValue", ValueKind::String).renamed("field_value"))
        .member(
            RawMember::setter("setMethodInjected", any_object(), |r, v| {
                r.set("methodInjected", v);
                Ok(())
            })
            .inject_named("method_injected"),
        )
        .member(
            RawMember::setter("setMethodValue", ValueKind::String, |r, v| {
                r.set("methodValue", v);
                Ok(())
            })
            .renamed("method_value"),
        )
        .member(RawMember::field("x", ValueKind::Int))
}

fn transient_bean() -> RawShape {
    RawShape::new("TransientBean")
        .default_creator()
        .member(
            RawMember::field("injected", any_object())
                .inject_named("transient")
                .transient(),
        )
        .member(RawMember::field("value", ValueKind::Int))
}

/// Immutable: updates go through the creator.
fn point() -> RawShape {
    RawShape::new("Point")
        .immutable()
        .creator(RawCreator::public(
            vec![
                RawParam::property("x", ValueKind::Int).required(),
                RawParam::property("y", ValueKind::Int),
            ],
            |args| {
                let mut args = args.into_iter();
                Ok(Record::new("Point")
                    .with("x", args.next().unwrap_or_default())
                    .with("y", args.next().unwrap_or_default()))
            },
        ))
        .member(RawMember::field("label", ValueKind::String))
        .member(RawMember::field("cache", ValueKind::Any).transient())
}

/// Containers of every mergeable kind.
fn catalog() -> RawShape {
    RawShape::new("Catalog")
        .default_creator()
        .member(RawMember::field("tags", ValueKind::seq(ValueKind::String)).merge())
        .member(RawMember::field("ids", ValueKind::set(ValueKind::Int)).merge())
        .member(RawMember::field("attrs", ValueKind::map(ValueKind::Int)).merge())
        .member(RawMember::field("items", ValueKind::seq(ab_kind())).merge())
        .member(RawMember::field("children", ValueKind::map(ab_kind())).merge())
        .member(RawMember::field("origin", ValueKind::object("Point")).merge())
        .member(RawMember::field("plain", ValueKind::seq(ValueKind::Int)))
        .member(RawMember::field("count", ValueKind::Int))
}

/// Links to another node; the link can point back at itself.
fn node() -> RawShape {
    RawShape::new("Node")
        .default_creator()
        .member(RawMember::field("name", ValueKind::String))
        .member(RawMember::field("next", ValueKind::object("Node")).merge())
}

/// Rejects negative values in its setter.
fn counter() -> RawShape {
    RawShape::new("Counter")
        .default_creator()
        .member(RawMember::field("label", ValueKind::String))
        .member(RawMember::field("inner", ab_kind()).merge())
        .member(
            RawMember::setter("value", ValueKind::Int, |r, v| match v.as_i64() {
                Some(n) if n < 0 => Err(format!("{n} is negative")),
                _ => {
                    r.set("value", v);
                    Ok(())
                }
            })
            .with_getter(|r| r.get("value").cloned().unwrap_or_default()),
        )
}

pub fn registry() -> ShapeRegistry {
    ShapeRegistry::new()
        .with(ab_shape())
        .with(config_shape(
            "ConfigDefault",
            RawMember::field("loc", ab_kind()).merge(),
        ))
        .with(config_shape(
            "ConfigSkipNull",
            RawMember::field("loc", ab_kind()).merge().nulls(Nulls::Skip),
        ))
        .with(config_shape(
            "ConfigAllowNullOverwrite",
            RawMember::field("loc", ab_kind()).merge().nulls(Nulls::Set),
        ))
        .with(no_setter_shape())
        .with(injected_bean())
        .with(ctor_bean())
        .with(ctor_bean2())
        .with(interleaved_bean())
        .with(transient_bean())
        .with(point())
        .with(catalog())
        .with(node())
        .with(counter())
}

pub fn binder() -> Binder {
    Binder::new(registry())
}
