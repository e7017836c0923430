use crate::serde::{Context, Handler};
use crate::value::{ListRef, Value};

/// Handles lists.
///
/// Deserialization writes into the existing list when there is one,
/// element by element, and truncates it to the length of the data.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequenceHandler;

impl Handler for SequenceHandler {
    fn name(&self) -> &str {
        "sequence"
    }

    fn priority(&self) -> Option<f64> {
        Some(0.0)
    }

    fn is_type(&self, value: &Value) -> bool {
        matches!(value, Value::List(_))
    }

    fn serialize(&self, value: &Value, cx: &Context<'_>) -> Value {
        let Value::List(list) = value else {
            return value.clone();
        };
        let items = list.to_vec();
        Value::list(items.iter().map(|item| cx.serialize(item)))
    }

    fn deserialize(&self, data: &Value, existing: Value, cx: &Context<'_>) -> Value {
        let Value::List(items) = data else {
            return data.clone();
        };
        let target = match existing {
            Value::List(list) => list,
            _ => ListRef::new(),
        };

        let items = items.to_vec();
        for (index, item) in items.iter().enumerate() {
            let next = cx.deserialize(item, target.get(index));
            target.set(index, next);
        }
        target.truncate(items.len());
        Value::List(target)
    }
}
