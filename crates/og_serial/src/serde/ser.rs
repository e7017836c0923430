use crate::serde::{CLASS_ID_KEY, Context};
use crate::value::{ObjectRef, Value};

/// Encodes `value` into its wire form.
///
/// Dispatch order:
///
/// 1. Functions encode as [`Value::Undefined`], dropped from structures.
/// 2. Unless `inner`, the first accepting handler encodes the value.
/// 3. Unless `inner`, an instance whose class has a serialize hook is
///    encoded by the hook; an object result is stamped with the class id.
/// 4. Otherwise a fresh structure receives the registered properties of
///    every ancestor, nearest first, then the class id.
pub(super) fn serialize(cx: &Context<'_>, value: &Value, inner: bool) -> Value {
    if value.is_function() {
        return Value::Undefined;
    }

    let handlers = cx.registry().handlers();
    let Value::Object(object) = value else {
        // Non-objects have no properties to walk, even for inner calls.
        return match handlers.find(value) {
            Some(handler) => {
                trace_dispatch!("serialize {} with `{}`", value.kind(), handler.name());
                handler.serialize(value, cx)
            }
            None => value.clone(),
        };
    };

    if !inner && let Some(handler) = handlers.find(value) {
        trace_dispatch!("serialize object with `{}`", handler.name());
        return handler.serialize(value, cx);
    }

    let class = object.class();
    if !inner && let Some(hook) = class.as_ref().and_then(|c| c.serialize_hook()) {
        let result = hook(object, cx);
        if let (Value::Object(out), Some(id)) = (&result, cx.class_id(value)) {
            out.assign(CLASS_ID_KEY, Value::from(&*id));
        }
        return result;
    }

    let result = ObjectRef::plain();
    if let Some(class) = &class {
        for ancestor in class.ancestors() {
            for entry in cx.registry().properties().entries(ancestor) {
                let encoded = serialize(cx, &object.get(entry.property_key()), false);
                if encoded.is_undefined() {
                    result.borrow_mut().remove(entry.wire_key());
                } else {
                    result.assign(entry.wire_key(), encoded);
                }
            }
        }
    }
    if let Some(id) = cx.class_id(value) {
        result.assign(CLASS_ID_KEY, Value::from(&*id));
    }
    Value::Object(result)
}
