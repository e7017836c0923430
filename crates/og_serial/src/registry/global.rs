use alloc::borrow::Cow;
use alloc::sync::Arc;
use core::fmt;
use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::info::ClassRef;
use crate::registry::{RegistrationError, Registry};
use crate::serde::Handler;

// -----------------------------------------------------------------------------
// RegistryArc

/// A shared, lockable [`Registry`].
#[derive(Clone, Default)]
pub struct RegistryArc {
    /// The wrapped [`Registry`].
    pub internal: Arc<RwLock<Registry>>,
}

impl RegistryArc {
    #[inline]
    pub fn new(registry: Registry) -> Self {
        Self {
            internal: Arc::new(RwLock::new(registry)),
        }
    }

    /// Takes a read lock on the underlying [`Registry`].
    pub fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`Registry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for RegistryArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.read(), f)
    }
}

// -----------------------------------------------------------------------------
// Global

/// The process-wide registry.
///
/// Created on first use with the built-in handlers, then filled by
/// [`Registry::auto_register`].
///
/// Top-level [`serialize`](crate::serde::serialize) and
/// [`deserialize`](crate::serde::deserialize) hold its read lock for the
/// whole run, so hooks and handlers must not register anything through the
/// free functions below.
pub fn global() -> &'static RegistryArc {
    static GLOBAL: LazyLock<RegistryArc> = LazyLock::new(|| {
        let mut registry = Registry::new();
        if !registry.auto_register() {
            log::debug!("static registration unavailable, global registry holds built-ins only");
        }
        RegistryArc::new(registry)
    });
    &GLOBAL
}

/// [`Registry::register_property`] on the [`global`] registry.
pub fn register_property(
    class: &ClassRef,
    wire_key: impl Into<Cow<'static, str>>,
    property_key: impl Into<Cow<'static, str>>,
) -> Result<(), RegistrationError> {
    global()
        .write()
        .register_property(class, wire_key, property_key)
}

/// [`Registry::register_class`] on the [`global`] registry.
pub fn register_class(id: &str, class: &ClassRef) -> Result<(), RegistrationError> {
    global().write().register_class(id, class)
}

/// [`Registry::register_handler`] on the [`global`] registry.
pub fn register_handler(handlers: impl IntoIterator<Item = Arc<dyn Handler>>) {
    global().write().register_handler(handlers);
}

/// [`Registry::unregister_handler`] on the [`global`] registry.
pub fn unregister_handler(handlers: impl IntoIterator<Item = Arc<dyn Handler>>) {
    global().write().unregister_handler(handlers);
}

#[cfg(test)]
mod tests {
    use crate::info::Class;
    use crate::value::Value;

    #[test]
    fn free_functions_use_global() {
        let class = Class::builder("GlobalProbe")
            .init(|o| o.define("v", Value::from(4)))
            .build();
        super::register_class("GlobalProbe", &class).unwrap();
        super::register_property(&class, "value", "v").unwrap();

        let wire = crate::serialize(&Value::Object(Class::instantiate(&class)), None);
        assert_eq!(wire.get("value").as_number(), Some(4.0));
        assert_eq!(wire.get("serializableClassId").as_str(), Some("GlobalProbe"));

        let back = crate::deserialize(&wire, Value::Undefined, None);
        assert!(back.as_object().unwrap().class().is_some());
        assert!(super::global().read().classes().contains("GlobalProbe"));
    }
}
