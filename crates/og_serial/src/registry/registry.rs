use alloc::borrow::Cow;
use alloc::sync::Arc;

use crate::info::ClassRef;
use crate::registry::{ClassRegistry, HandlerRegistry, PropertyRegistry, RegistrationError};
use crate::serde::Handler;

// -----------------------------------------------------------------------------
// Registry

/// Everything the engine consults during a run: serialized properties,
/// reconstructable classes and value handlers.
///
/// Most programs use the process-wide instance behind
/// [`global`](crate::registry::global). Local instances are useful for tests
/// and for isolated serialization domains.
///
/// # Examples
///
/// ```
/// use og_serial::info::Class;
/// use og_serial::registry::Registry;
///
/// let point = Class::builder("Point").build();
///
/// let mut registry = Registry::new();
/// registry.register_class("Point", &point).unwrap();
/// registry.register_property(&point, "x", "x").unwrap();
///
/// assert!(registry.classes().resolve("Point").is_some());
/// assert_eq!(registry.properties().entries(&point).len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    properties: PropertyRegistry,
    classes: ClassRegistry,
    handlers: HandlerRegistry,
    pub(crate) auto_registered: bool,
}

impl Registry {
    /// Creates a registry with the built-in handlers and nothing else.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry without dispatchable handlers.
    pub fn empty() -> Self {
        Self {
            handlers: HandlerRegistry::empty(),
            ..Self::default()
        }
    }

    /// See [`PropertyRegistry::register`].
    pub fn register_property(
        &mut self,
        class: &ClassRef,
        wire_key: impl Into<Cow<'static, str>>,
        property_key: impl Into<Cow<'static, str>>,
    ) -> Result<(), RegistrationError> {
        self.properties.register(class, wire_key, property_key)
    }

    /// See [`ClassRegistry::register`].
    pub fn register_class(&mut self, id: &str, class: &ClassRef) -> Result<(), RegistrationError> {
        self.classes.register(id, class).map(|_| ())
    }

    /// See [`HandlerRegistry::register`].
    pub fn register_handler(&mut self, handlers: impl IntoIterator<Item = Arc<dyn Handler>>) {
        self.handlers.register(handlers);
    }

    /// See [`HandlerRegistry::unregister`].
    pub fn unregister_handler(&mut self, handlers: impl IntoIterator<Item = Arc<dyn Handler>>) {
        self.handlers.unregister(handlers);
    }

    #[inline]
    pub fn properties(&self) -> &PropertyRegistry {
        &self.properties
    }

    #[inline]
    pub fn properties_mut(&mut self) -> &mut PropertyRegistry {
        &mut self.properties
    }

    #[inline]
    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    #[inline]
    pub fn classes_mut(&mut self) -> &mut ClassRegistry {
        &mut self.classes
    }

    #[inline]
    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    #[inline]
    pub fn handlers_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.handlers
    }

    /// Runs every registration function submitted through
    /// [`auto_register!`](crate::auto_register).
    ///
    /// Repeated calls are cheap and do not register anything twice.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if static registration is supported on the current
    /// platform. Always `false` without the `auto_register` feature.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use og_serial::info::{Class, ClassRef};
    /// use og_serial::registry::Registry;
    /// use std::sync::LazyLock;
    ///
    /// static POINT: LazyLock<ClassRef> = LazyLock::new(|| Class::builder("Point").build());
    ///
    /// fn register_point(registry: &mut Registry) {
    ///     registry.register_class("Point", &POINT).unwrap();
    /// }
    ///
    /// og_serial::auto_register!(register_point);
    ///
    /// let mut registry = Registry::new();
    /// assert!(registry.auto_register());
    /// assert!(registry.classes().contains("Point"));
    /// ```
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            if self.auto_registered {
                return true;
            }
            crate::registry::auto_register::register_all(self);
            self.auto_registered
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }
}

#[cfg(all(test, feature = "auto_register"))]
mod tests {
    use std::sync::LazyLock;

    use super::Registry;
    use crate::info::{Class, ClassRef};

    static PROBE: LazyLock<ClassRef> = LazyLock::new(|| Class::builder("AutoProbe").build());

    fn register_probe(registry: &mut Registry) {
        registry.register_class("AutoProbe", &PROBE).unwrap();
        registry.register_property(&PROBE, "p", "p").unwrap();
    }

    og_serial::auto_register!(register_probe);

    #[test]
    fn auto_register_runs_once() {
        let mut registry = Registry::new();
        assert!(registry.auto_register());
        assert!(registry.classes().contains("AutoProbe"));

        assert!(registry.auto_register());
        assert_eq!(registry.properties().entries(&PROBE).len(), 1);
    }
}
