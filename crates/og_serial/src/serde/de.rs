use alloc::borrow::Cow;

use crate::info::Class;
use crate::serde::{Context, ResourceRef};
use crate::value::{ListRef, ObjectRef, Value};

enum Resolution {
    /// The run ends with this value.
    Done(Value),
    /// Reconstruction continues with this value as data.
    Continue(Value),
}

fn resolve_resource(cx: &Context<'_>, reference: &ResourceRef, existing: &Value) -> Resolution {
    let Some(pool) = cx.meta().and_then(|meta| meta.pool(reference.pool())) else {
        log::warn!("resource pool `{}` not found", reference.pool());
        return Resolution::Done(existing.clone());
    };
    let Some(pooled) = pool.get(reference.uuid()) else {
        log::warn!("resource `{reference}` not found");
        return Resolution::Done(existing.clone());
    };

    if let Value::Object(object) = pooled {
        object.borrow_mut().bump_use_count();
    }
    if existing.same(pooled) {
        return Resolution::Done(existing.clone());
    }

    match pooled {
        Value::Object(object) if object.is_plain() => {
            log::error!("resource `{reference}` holds a plain structure instead of an instance");
            Resolution::Continue(pooled.clone())
        }
        Value::Object(_) | Value::List(_) => {
            if existing.is_truthy() {
                log::warn!(
                    "existing {} replaced by resource `{reference}`",
                    existing.kind(),
                );
            }
            Resolution::Done(pooled.clone())
        }
        _ => Resolution::Continue(pooled.clone()),
    }
}

/// Reconstructs `data`, reusing `existing` where possible.
///
/// Steps:
///
/// 1. Undefined data keeps `existing`.
/// 2. Data identical to `existing` keeps it.
/// 3. A resource reference resolves through the context's pools.
/// 4. A missing or mismatched target is created: an instance of the class
///    named by the data's class id, or an empty structure or list.
/// 5. A function target is never written into.
/// 6. Unless `inner`, the first accepting handler other than the
///    structure handler takes over.
/// 7. Falsy data, or a non-container target, yields the data itself.
/// 8. Unless `inner`, the class's deserialize hook fills the instance.
/// 9. Plain targets go through the structure handler.
/// 10. Instances receive their registered properties, ancestors included,
///     each written only if it changed.
pub(super) fn deserialize(cx: &Context<'_>, data: &Value, existing: Value, inner: bool) -> Value {
    if data.is_undefined() || existing.same(data) {
        return existing;
    }

    let data = match ResourceRef::parse(data) {
        Some(reference) => match resolve_resource(cx, &reference, &existing) {
            Resolution::Done(value) => return value,
            Resolution::Continue(pooled) => Cow::Owned(pooled),
        },
        None => Cow::Borrowed(data),
    };
    let data: &Value = &data;

    let mut existing = existing;
    if data.is_container() {
        let data_id = data.class_id().filter(|id| !id.is_empty());
        match data_id {
            Some(id) if !existing.is_truthy() || cx.class_id(&existing).as_deref() != Some(&*id) => {
                match cx.registry().classes().resolve(&id) {
                    Some(class) => {
                        let instance = if class.consumes_data() {
                            Class::instantiate_with_data(class, data)
                        } else {
                            Class::instantiate(class)
                        };
                        existing = Value::Object(instance);
                    }
                    None => log::warn!("no class registered under id `{id}`"),
                }
            }
            _ if existing.is_truthy() => {}
            _ if data.is_plain_object() => existing = Value::Object(ObjectRef::plain()),
            _ if matches!(data, Value::List(_)) => existing = Value::List(ListRef::new()),
            _ => {}
        }
    }

    if let Value::Function(function) = &existing {
        log::error!("cannot deserialize into function `{}`", function.name());
        return existing;
    }

    let handlers = cx.registry().handlers();
    if !inner
        && let Some(handler) = handlers.find(data)
        && !handlers.is_structure(handler)
    {
        trace_dispatch!("deserialize {} with `{}`", data.kind(), handler.name());
        return handler.deserialize(data, existing, cx);
    }

    if !data.is_truthy() || !existing.is_container() {
        return data.clone();
    }
    let Value::Object(object) = &existing else {
        return existing;
    };

    let class = object.class();
    if !inner && let Some(hook) = class.as_ref().and_then(|c| c.deserialize_hook()) {
        hook(object, data, cx);
        return existing;
    }

    let Some(class) = class else {
        return handlers.structure().deserialize(data, existing, cx);
    };

    for ancestor in class.ancestors() {
        for entry in cx.registry().properties().entries(ancestor) {
            let current = object.get(entry.property_key());
            let next = deserialize(cx, &data.get(entry.wire_key()), current.clone(), false);
            if !next.same(&current) {
                object.safe_set(entry.property_key(), next);
            }
        }
    }
    existing
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};

    use crate::info::{Class, ClassRef};
    use crate::registry::Registry;
    use crate::serde::{Context, FnHandler, Handler, ResourceMeta, ResourceRef};
    use crate::value::{Function, ObjectRef, Value};

    fn foo(registry: &mut Registry) -> ClassRef {
        let class = Class::builder("Foo")
            .init(|o| {
                o.define("x", Value::from(0));
                o.define("y", Value::from(0));
            })
            .build();
        registry.register_class("Foo", &class).unwrap();
        registry.register_property(&class, "x", "x").unwrap();
        registry.register_property(&class, "y", "y").unwrap();
        class
    }

    #[test]
    fn plain_round_trip() {
        let registry = Registry::new();
        let cx = Context::new(&registry);
        let value = Value::object([
            ("name", Value::from("graph")),
            ("flag", Value::from(false)),
            ("none", Value::Null),
            ("count", Value::from(3)),
            (
                "items",
                Value::list([
                    Value::from(1.5),
                    Value::object([("deep", Value::list([Value::from("x")]))]),
                    Value::list([]),
                ]),
            ),
        ]);

        let back = cx.deserialize(&cx.serialize(&value), Value::Undefined);
        assert!(back.deep_eq(&value), "{back:?}");
        assert!(!back.same(&value));
    }

    #[test]
    fn non_finite_numbers() {
        let registry = Registry::new();
        let cx = Context::new(&registry);

        for number in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let wire = cx.serialize(&Value::from(number));
            assert!(wire.as_str().is_some());
            let back = cx.deserialize(&wire, Value::from(0));
            assert!(back.same(&Value::from(number)), "{back:?}");
            let kept = cx.deserialize(&wire, Value::from(""));
            assert!(kept.same(&wire));
        }
    }

    #[test]
    fn class_reconstruction() {
        let mut registry = Registry::new();
        let class = foo(&mut registry);
        let cx = Context::new(&registry);

        let instance = Class::instantiate(&class);
        instance.assign("x", Value::from(1));
        instance.assign("y", Value::from(2));

        let wire = cx.serialize(&Value::Object(instance));
        let expected = Value::object([
            ("x", Value::from(1)),
            ("y", Value::from(2)),
            ("serializableClassId", Value::from("Foo")),
        ]);
        assert!(wire.deep_eq(&expected), "{wire:?}");

        let back = cx.deserialize(&wire, Value::Undefined);
        let object = back.as_object().unwrap();
        assert!(object.class().is_some_and(|c| Arc::ptr_eq(&c, &class)));
        assert_eq!(object.get("x").as_number(), Some(1.0));
        assert_eq!(object.get("y").as_number(), Some(2.0));
    }

    #[test]
    fn existing_instance_is_updated_in_place() {
        let mut registry = Registry::new();
        let class = foo(&mut registry);
        let cx = Context::new(&registry);

        let target = Value::Object(Class::instantiate(&class));
        let data = Value::object([("x", Value::from(5)), ("serializableClassId", Value::from("Foo"))]);
        let back = cx.deserialize(&data, target.clone());
        assert!(back.same(&target));
        assert_eq!(target.get("x").as_number(), Some(5.0));
        assert_eq!(target.get("y").as_number(), Some(0.0));
    }

    #[test]
    fn readonly_properties_are_skipped() {
        let mut registry = Registry::new();
        let class = Class::builder("Keyed")
            .init(|o| {
                o.define_readonly("id", Value::from("a"));
                o.define("v", Value::from(1));
            })
            .build();
        registry.register_class("Keyed", &class).unwrap();
        registry.register_property(&class, "id", "id").unwrap();
        registry.register_property(&class, "v", "v").unwrap();
        let cx = Context::new(&registry);

        let target = Value::Object(Class::instantiate(&class));
        let data = Value::object([("id", Value::from("b")), ("v", Value::from(2))]);
        let back = cx.deserialize(&data, target.clone());
        assert!(back.same(&target));
        assert_eq!(target.get("id").as_str(), Some("a"));
        assert_eq!(target.get("v").as_number(), Some(2.0));
    }

    #[test]
    fn absent_properties_are_created() {
        let mut registry = Registry::new();
        let class = Class::builder("Lazy")
            .init(|o| o.define("x", Value::from(0)))
            .build();
        registry.register_class("Lazy", &class).unwrap();
        registry.register_property(&class, "x", "x").unwrap();
        registry.register_property(&class, "label", "label").unwrap();
        let cx = Context::new(&registry);

        let data = Value::object([
            ("x", Value::from(1)),
            ("label", Value::from("hello")),
            ("serializableClassId", Value::from("Lazy")),
        ]);
        let back = cx.deserialize(&data, Value::Undefined);
        assert_eq!(back.get("x").as_number(), Some(1.0));
        assert_eq!(back.get("label").as_str(), Some("hello"));
        assert!(back.as_object().unwrap().borrow().is_writable("label"));
    }

    #[test]
    fn unknown_class_id_yields_data() {
        let registry = Registry::new();
        let cx = Context::new(&registry);
        let data = Value::object([("serializableClassId", Value::from("Missing"))]);
        let back = cx.deserialize(&data, Value::Undefined);
        assert!(back.same(&data));
    }

    #[test]
    fn reassignment_is_idempotent() {
        thread_local! {
            static CHANGES: Cell<u32> = const { Cell::new(0) };
        }

        let mut registry = Registry::new();
        let class = Class::builder("Watched")
            .init(|o| {
                o.define("n", Value::from(0));
                o.define("tags", Value::list([]));
            })
            .on_change("n", |_, _, _| CHANGES.with(|c| c.set(c.get() + 1)))
            .on_change("tags", |_, _, _| CHANGES.with(|c| c.set(c.get() + 100)))
            .build();
        registry.register_class("Watched", &class).unwrap();
        registry.register_property(&class, "n", "n").unwrap();
        registry.register_property(&class, "tags", "tags").unwrap();
        let cx = Context::new(&registry);

        let target = Value::Object(Class::instantiate(&class));
        let tags = target.get("tags");
        let data = Value::object([("n", Value::from(7)), ("tags", Value::list([Value::from("a")]))]);

        cx.deserialize(&data, target.clone());
        assert_eq!(CHANGES.with(Cell::get), 1);
        assert!(target.get("tags").same(&tags));

        cx.deserialize(&data, target.clone());
        assert_eq!(CHANGES.with(Cell::get), 1);
        assert_eq!(tags.as_list().unwrap().len(), 1);
    }

    #[test]
    fn resource_dedup() {
        let mut registry = Registry::new();
        let class = foo(&mut registry);

        let shared = Value::Object(Class::instantiate(&class));
        let mut meta = ResourceMeta::new();
        meta.insert("mats", "u1", shared.clone());
        let cx = Context::new(&registry).with_meta(Some(&meta));

        let node = ResourceRef::new("mats", "u1").to_value();
        let first = cx.deserialize(&node, Value::Undefined);
        let second = cx.deserialize(&node, Value::Undefined);

        assert!(first.same(&shared));
        assert!(second.same(&shared));
        assert_eq!(shared.as_object().unwrap().use_count(), 2);
    }

    #[test]
    fn resource_fallbacks() {
        let registry = Registry::new();
        let mut meta = ResourceMeta::new();
        meta.insert("nums", "one", Value::from(1));
        meta.insert("raw", "p", Value::object([("k", Value::from("v"))]));
        let cx = Context::new(&registry).with_meta(Some(&meta));
        let existing = Value::from("kept");

        let missing_pool = ResourceRef::new("nope", "x").to_value();
        assert!(cx.deserialize(&missing_pool, existing.clone()).same(&existing));
        let missing_id = ResourceRef::new("nums", "two").to_value();
        assert!(cx.deserialize(&missing_id, existing.clone()).same(&existing));
        let no_meta = Context::new(&registry);
        assert!(no_meta.deserialize(&missing_id, existing.clone()).same(&existing));

        let primitive = ResourceRef::new("nums", "one").to_value();
        assert_eq!(cx.deserialize(&primitive, Value::Undefined).as_number(), Some(1.0));

        let plain = ResourceRef::new("raw", "p").to_value();
        let back = cx.deserialize(&plain, Value::Undefined);
        assert_eq!(back.get("k").as_str(), Some("v"));
        assert!(!back.same(meta.get("raw", "p").unwrap()));
    }

    #[test]
    fn pooled_resource_replaces_existing() {
        let mut registry = Registry::new();
        let class = foo(&mut registry);
        let pooled = Value::Object(Class::instantiate(&class));
        let mut meta = ResourceMeta::new();
        meta.insert("mats", "u1", pooled.clone());
        let cx = Context::new(&registry).with_meta(Some(&meta));

        let other = Value::Object(Class::instantiate(&class));
        let node = ResourceRef::new("mats", "u1").to_value();
        assert!(cx.deserialize(&node, other).same(&pooled));
        assert!(cx.deserialize(&node, pooled.clone()).same(&pooled));
        assert_eq!(pooled.as_object().unwrap().use_count(), 2);
    }

    #[test]
    fn custom_handler_priority() {
        let upper = |name: &'static str| {
            FnHandler::new(
                name,
                |v| v.as_str().is_some(),
                move |_, _| Value::from(name),
                move |_, _, _| Value::from(name),
            )
        };

        let mut registry = Registry::new();
        registry.register_handler([Arc::new(upper("zero").with_priority(0.0)) as Arc<dyn Handler>]);
        let cx = Context::new(&registry);
        assert_eq!(cx.serialize(&Value::from("s")).as_str(), Some("zero"));
        assert_eq!(cx.serialize(&Value::from(1)).as_number(), Some(1.0));

        registry.register_handler([Arc::new(upper("minus").with_priority(-1.0)) as Arc<dyn Handler>]);
        let cx = Context::new(&registry);
        assert_eq!(cx.serialize(&Value::from("s")).as_str(), Some("minus"));
        assert_eq!(cx.deserialize(&Value::from("s"), Value::Undefined).as_str(), Some("minus"));
    }

    #[test]
    fn sequence_reuses_elements() {
        thread_local! {
            static SEEN: RefCell<Vec<Value>> = const { RefCell::new(Vec::new()) };
        }

        let spy = FnHandler::new(
            "spy",
            |v| v.as_number().is_some(),
            |v, _| v.clone(),
            |d, existing, _| {
                SEEN.with(|seen| seen.borrow_mut().push(existing));
                d.clone()
            },
        )
        .with_priority(-1.0);
        let mut registry = Registry::new();
        registry.register_handler([Arc::new(spy) as Arc<dyn Handler>]);
        let cx = Context::new(&registry);

        let a = Value::Object(ObjectRef::plain());
        let b = Value::Object(ObjectRef::plain());
        let target = Value::list([a.clone(), b.clone(), Value::from(3)]);
        let data = Value::list([Value::from(10), Value::from(20)]);

        let back = cx.deserialize(&data, target.clone());
        assert!(back.same(&target));

        SEEN.with(|seen| {
            let seen = seen.borrow();
            assert_eq!(seen.len(), 2);
            assert!(seen[0].same(&a));
            assert!(seen[1].same(&b));
        });
        assert!(back.deep_eq(&Value::list([Value::from(10), Value::from(20)])));
    }

    #[test]
    fn list_grows_and_truncates() {
        let registry = Registry::new();
        let cx = Context::new(&registry);
        let target = Value::list([Value::from(1)]);

        let data = Value::list([Value::from(1), Value::from(2), Value::from(3)]);
        cx.deserialize(&data, target.clone());
        assert_eq!(target.as_list().unwrap().len(), 3);
        cx.deserialize(&Value::list([]), target.clone());
        assert!(target.as_list().unwrap().is_empty());
    }

    #[test]
    fn structure_into_plain_target() {
        let registry = Registry::new();
        let cx = Context::new(&registry);
        let inner = Value::Object(ObjectRef::plain());
        let target = Value::object([("keep", Value::from(1)), ("inner", inner.clone())]);
        let data = Value::object([
            ("inner", Value::object([("z", Value::from(true))])),
            ("added", Value::from("yes")),
        ]);

        let back = cx.deserialize(&data, target.clone());
        assert!(back.same(&target));
        assert!(target.get("inner").same(&inner));
        assert_eq!(inner.get("z").as_bool(), Some(true));
        assert_eq!(target.get("keep").as_number(), Some(1.0));
        assert_eq!(target.get("added").as_str(), Some("yes"));
    }

    #[test]
    fn function_target_is_kept() {
        let registry = Registry::new();
        let cx = Context::new(&registry);
        let f = Value::from(Function::new("f", |_| Value::Null));
        let back = cx.deserialize(&Value::object([("a", Value::from(1))]), f.clone());
        assert!(back.same(&f));
    }

    #[test]
    fn falsy_data_replaces_target() {
        let registry = Registry::new();
        let cx = Context::new(&registry);
        let target = Value::object([("a", Value::from(1))]);
        assert!(cx.deserialize(&Value::Null, target.clone()).is_null());
        assert!(cx.deserialize(&Value::Undefined, target.clone()).same(&target));
    }

    #[test]
    fn hooks_and_data_constructors() {
        let mut registry = Registry::new();
        let class = Class::builder("Sized")
            .construct_with_data(|o, data| {
                let len = data.get("items").as_list().map_or(0, |l| l.len());
                o.define("len", Value::from(len));
            })
            .deserialize_hook(|object, data, cx| {
                let items = cx.deserialize(&data.get("items"), object.get("items"));
                object.assign("items", items);
            })
            .build();
        registry.register_class("Sized", &class).unwrap();
        let cx = Context::new(&registry);

        let data = Value::object([
            ("serializableClassId", Value::from("Sized")),
            ("items", Value::list([Value::from(1), Value::from(2)])),
        ]);
        let back = cx.deserialize(&data, Value::Undefined);
        assert_eq!(back.get("len").as_number(), Some(2.0));
        assert_eq!(back.get("items").as_list().map(|l| l.len()), Some(2));

        let inner = cx.deserialize_inner(&data, Value::Object(Class::instantiate(&class)));
        assert!(inner.get("items").is_undefined());
    }

    #[test]
    fn inherited_properties_are_restored() {
        let mut registry = Registry::new();
        let base = foo(&mut registry);
        let child = Class::builder("Bar")
            .extends(&base)
            .init(|o| o.define("z", Value::from(0)))
            .build();
        registry.register_class("Bar", &child).unwrap();
        registry.register_property(&child, "zz", "z").unwrap();
        let cx = Context::new(&registry);

        let data = Value::object([
            ("zz", Value::from(3)),
            ("x", Value::from(1)),
            ("serializableClassId", Value::from("Bar")),
        ]);
        let back = cx.deserialize(&data, Value::Undefined);
        assert!(back.as_object().unwrap().class().is_some_and(|c| Arc::ptr_eq(&c, &child)));
        assert_eq!(back.get("z").as_number(), Some(3.0));
        assert_eq!(back.get("x").as_number(), Some(1.0));
        assert_eq!(back.get("y").as_number(), Some(0.0));
    }
}
