use alloc::sync::Arc;

use crate::registry::Registry;
use crate::serde::{ResourceMeta, de, ser};
use crate::value::Value;

/// State shared by one serialization or deserialization run.
///
/// Handlers and class hooks receive the context and recurse through it.
///
/// # Examples
///
/// ```
/// use og_serial::registry::Registry;
/// use og_serial::serde::Context;
/// use og_serial::value::Value;
///
/// let registry = Registry::new();
/// let cx = Context::new(&registry);
///
/// let wire = cx.serialize(&Value::list([Value::from(f64::INFINITY)]));
/// assert_eq!(wire.as_list().unwrap().get(0).as_str(), Some("Infinity"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    registry: &'a Registry,
    meta: Option<&'a ResourceMeta>,
}

impl<'a> Context<'a> {
    #[inline]
    pub const fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            meta: None,
        }
    }

    /// Sets the resource pools consulted for resource references.
    #[inline]
    pub const fn with_meta(mut self, meta: Option<&'a ResourceMeta>) -> Self {
        self.meta = meta;
        self
    }

    #[inline]
    pub const fn registry(&self) -> &'a Registry {
        self.registry
    }

    #[inline]
    pub const fn meta(&self) -> Option<&'a ResourceMeta> {
        self.meta
    }

    /// The class id `value` is written with.
    ///
    /// An own `serializableClassId` string field takes precedence,
    /// otherwise the registry is asked for the id of the object's class.
    pub fn class_id(&self, value: &Value) -> Option<Arc<str>> {
        let object = value.as_object()?;
        object.class_id().or_else(|| {
            let class = object.class()?;
            self.registry.classes().class_id(&class).map(Arc::from)
        })
    }

    /// Serializes `value` with full dispatch.
    #[inline]
    pub fn serialize(&self, value: &Value) -> Value {
        ser::serialize(self, value, false)
    }

    /// Serializes an instance by its registered properties, skipping
    /// handlers and its class's serialize hook.
    ///
    /// Meant for hooks that extend the default encoding.
    #[inline]
    pub fn serialize_inner(&self, value: &Value) -> Value {
        ser::serialize(self, value, true)
    }

    /// Reconstructs `data`, reusing `existing` where possible.
    #[inline]
    pub fn deserialize(&self, data: &Value, existing: Value) -> Value {
        de::deserialize(self, data, existing, false)
    }

    /// Reconstructs `data` into `existing` by registered properties,
    /// skipping handlers and the deserialize hook.
    #[inline]
    pub fn deserialize_inner(&self, data: &Value, existing: Value) -> Value {
        de::deserialize(self, data, existing, true)
    }
}
