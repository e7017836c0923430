use crate::serde::{Context, Handler};
use crate::value::Value;

/// Wire form of `f64::INFINITY`.
pub const POS_INFINITY: &str = "Infinity";
/// Wire form of `f64::NEG_INFINITY`.
pub const NEG_INFINITY: &str = "-Infinity";
/// Wire form of `f64::NAN`.
pub const NAN: &str = "NaN";

/// Handles every non-container value.
///
/// Non-finite numbers are encoded as strings. They are only decoded back
/// when the existing value is a number, so a string field holding
/// `"NaN"` stays a string.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrimitiveHandler;

impl Handler for PrimitiveHandler {
    fn name(&self) -> &str {
        "primitive"
    }

    fn priority(&self) -> Option<f64> {
        Some(0.0)
    }

    fn is_type(&self, value: &Value) -> bool {
        !value.is_container()
    }

    fn serialize(&self, value: &Value, _cx: &Context<'_>) -> Value {
        match value {
            Value::Number(n) if n.is_nan() => Value::from(NAN),
            Value::Number(n) if *n == f64::INFINITY => Value::from(POS_INFINITY),
            Value::Number(n) if *n == f64::NEG_INFINITY => Value::from(NEG_INFINITY),
            _ => value.clone(),
        }
    }

    fn deserialize(&self, data: &Value, existing: Value, _cx: &Context<'_>) -> Value {
        if let (Value::Number(_), Some(s)) = (&existing, data.as_str()) {
            match s {
                POS_INFINITY => return Value::Number(f64::INFINITY),
                NEG_INFINITY => return Value::Number(f64::NEG_INFINITY),
                NAN => return Value::Number(f64::NAN),
                _ => {}
            }
        }
        data.clone()
    }
}
