use alloc::string::String;
use alloc::vec::Vec;

use crate::serde::{Context, Handler};
use crate::value::{ObjectRef, Value};

/// Handles plain structures, field by field.
///
/// Registered last. The engine also falls back to it for plain targets
/// that no other handler claimed.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructureHandler;

fn entries(object: &ObjectRef) -> Vec<(String, Value)> {
    object
        .borrow()
        .iter()
        .map(|(key, value)| (String::from(key), value.clone()))
        .collect()
}

impl Handler for StructureHandler {
    fn name(&self) -> &str {
        "structure"
    }

    fn priority(&self) -> Option<f64> {
        Some(f64::INFINITY)
    }

    fn is_type(&self, value: &Value) -> bool {
        value.is_plain_object()
    }

    fn serialize(&self, value: &Value, cx: &Context<'_>) -> Value {
        let Value::Object(object) = value else {
            return value.clone();
        };
        let result = ObjectRef::plain();
        for (key, field) in entries(object) {
            let encoded = cx.serialize(&field);
            if !encoded.is_undefined() {
                result.assign(&key, encoded);
            }
        }
        Value::Object(result)
    }

    fn deserialize(&self, data: &Value, existing: Value, cx: &Context<'_>) -> Value {
        let target = match existing {
            Value::Object(object) => object,
            _ => ObjectRef::plain(),
        };
        let Value::Object(source) = data else {
            return Value::Object(target);
        };
        for (key, field) in entries(source) {
            let next = cx.deserialize(&field, target.get(&key));
            target.assign(&key, next);
        }
        Value::Object(target)
    }
}
