use alloc::borrow::Cow;
use alloc::boxed::Box;
use core::fmt;

use crate::serde::Context;
use crate::value::Value;

/// Priority assumed for handlers that do not declare one.
pub const DEFAULT_PRIORITY: f64 = 1e10;

// -----------------------------------------------------------------------------
// Handler

/// Serializes and reconstructs a specific kind of value.
///
/// Handlers are consulted in the order kept by
/// [`HandlerRegistry`](crate::registry::HandlerRegistry); the first one whose
/// [`is_type`](Handler::is_type) accepts a value owns it. `is_type` is called
/// with live values during serialization and with wire data during
/// deserialization.
///
/// Nested values should go back through the [`Context`], never through the
/// free functions, so the same registry and resource pools stay in use.
pub trait Handler: Send + Sync + 'static {
    /// Name used in diagnostics.
    fn name(&self) -> &str {
        core::any::type_name::<Self>()
    }

    /// Dispatch priority, lower runs first. `None` sorts after every
    /// handler below [`DEFAULT_PRIORITY`].
    fn priority(&self) -> Option<f64> {
        None
    }

    fn is_type(&self, value: &Value) -> bool;

    fn serialize(&self, value: &Value, cx: &Context<'_>) -> Value;

    /// Reconstructs `data`, reusing `existing` where possible.
    fn deserialize(&self, data: &Value, existing: Value, cx: &Context<'_>) -> Value;
}

// -----------------------------------------------------------------------------
// FnHandler

type IsTypeFn = dyn Fn(&Value) -> bool + Send + Sync;
type SerializeFn = dyn Fn(&Value, &Context<'_>) -> Value + Send + Sync;
type DeserializeFn = dyn Fn(&Value, Value, &Context<'_>) -> Value + Send + Sync;

/// A [`Handler`] assembled from closures.
///
/// # Examples
///
/// ```
/// use og_serial::registry::Registry;
/// use og_serial::serde::{Context, FnHandler, Handler};
/// use og_serial::value::Value;
/// use std::sync::Arc;
///
/// // Booleans travel as 0 / 1.
/// let bits = FnHandler::new(
///     "bits",
///     |v| v.as_bool().is_some() || v.as_number().is_some(),
///     |v, _| Value::from(v.is_truthy() as i32),
///     |d, existing, _| match existing {
///         Value::Bool(_) => Value::from(d.is_truthy()),
///         _ => d.clone(),
///     },
/// )
/// .with_priority(-1.0);
///
/// let mut registry = Registry::new();
/// registry.register_handler([Arc::new(bits) as Arc<dyn Handler>]);
/// let cx = Context::new(&registry);
///
/// assert_eq!(cx.serialize(&Value::from(true)).as_number(), Some(1.0));
/// assert_eq!(cx.deserialize(&Value::from(0), Value::from(true)).as_bool(), Some(false));
/// ```
pub struct FnHandler {
    name: Cow<'static, str>,
    priority: Option<f64>,
    is_type: Box<IsTypeFn>,
    serialize: Box<SerializeFn>,
    deserialize: Box<DeserializeFn>,
}

impl FnHandler {
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        is_type: impl Fn(&Value) -> bool + Send + Sync + 'static,
        serialize: impl Fn(&Value, &Context<'_>) -> Value + Send + Sync + 'static,
        deserialize: impl Fn(&Value, Value, &Context<'_>) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            priority: None,
            is_type: Box::new(is_type),
            serialize: Box::new(serialize),
            deserialize: Box::new(deserialize),
        }
    }

    #[inline]
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }
}

impl Handler for FnHandler {
    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn priority(&self) -> Option<f64> {
        self.priority
    }

    #[inline]
    fn is_type(&self, value: &Value) -> bool {
        (self.is_type)(value)
    }

    #[inline]
    fn serialize(&self, value: &Value, cx: &Context<'_>) -> Value {
        (self.serialize)(value, cx)
    }

    #[inline]
    fn deserialize(&self, data: &Value, existing: Value, cx: &Context<'_>) -> Value {
        (self.deserialize)(data, existing, cx)
    }
}

impl fmt::Debug for FnHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}
