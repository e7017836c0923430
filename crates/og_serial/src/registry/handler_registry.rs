use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::serde::builtin::{PrimitiveHandler, SequenceHandler, StructureHandler};
use crate::serde::{DEFAULT_PRIORITY, Handler};
use crate::value::Value;

/// Returns `true` if a handler with priority `existing` stays in front of a
/// newly registered handler with priority `new`.
///
/// Lower priorities dispatch first. Handlers without a priority dispatch
/// after every prioritized handler below [`DEFAULT_PRIORITY`] and keep their
/// registration order among themselves.
fn precedes(existing: Option<f64>, new: Option<f64>) -> bool {
    match (existing, new) {
        (None, None) => true,
        _ => existing.unwrap_or(DEFAULT_PRIORITY) < new.unwrap_or(DEFAULT_PRIORITY),
    }
}

#[inline]
fn same_handler(a: &Arc<dyn Handler>, b: &Arc<dyn Handler>) -> bool {
    core::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Ordered list of [`Handler`]s consulted by the engine.
///
/// The first handler whose [`is_type`](Handler::is_type) accepts a value
/// owns it. [`HandlerRegistry::new`] installs the built-in handlers for
/// sequences, primitives and plain structures.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use og_serial::registry::HandlerRegistry;
/// use og_serial::serde::{FnHandler, Handler};
/// use og_serial::value::Value;
///
/// let strings: Arc<dyn Handler> = Arc::new(
///     FnHandler::new(
///         "strings",
///         |v| v.as_str().is_some(),
///         |v, _| v.clone(),
///         |d, _, _| d.clone(),
///     )
///     .with_priority(-1.0),
/// );
///
/// let mut handlers = HandlerRegistry::new();
/// handlers.register([strings]);
///
/// assert_eq!(handlers.find(&Value::from("x")).unwrap().name(), "strings");
/// assert_eq!(handlers.find(&Value::from(1)).unwrap().name(), "primitive");
/// ```
pub struct HandlerRegistry {
    handlers: Vec<Arc<dyn Handler>>,
    structure: Arc<dyn Handler>,
}

impl Default for HandlerRegistry {
    /// See [`HandlerRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl HandlerRegistry {
    /// Creates a registry with the built-in handlers.
    pub fn new() -> Self {
        let structure: Arc<dyn Handler> = Arc::new(StructureHandler);
        Self {
            handlers: alloc::vec![
                Arc::new(SequenceHandler) as Arc<dyn Handler>,
                Arc::new(PrimitiveHandler),
                structure.clone(),
            ],
            structure,
        }
    }

    /// Creates a registry without dispatchable handlers.
    ///
    /// The structure handler is still used as the fallback for plain
    /// structures, see [`HandlerRegistry::structure`].
    pub fn empty() -> Self {
        Self {
            handlers: Vec::new(),
            structure: Arc::new(StructureHandler),
        }
    }

    /// Inserts each handler after the last registered handler that
    /// precedes it, or at the front if none does.
    pub fn register(&mut self, handlers: impl IntoIterator<Item = Arc<dyn Handler>>) {
        for handler in handlers {
            let priority = handler.priority();
            let position = self
                .handlers
                .iter()
                .rposition(|h| precedes(h.priority(), priority))
                .map_or(0, |index| index + 1);
            self.handlers.insert(position, handler);
        }
    }

    /// Removes every occurrence of the given handlers. Unknown handlers are
    /// ignored.
    pub fn unregister(&mut self, handlers: impl IntoIterator<Item = Arc<dyn Handler>>) {
        for handler in handlers {
            self.handlers.retain(|h| !same_handler(h, &handler));
        }
    }

    /// The first handler accepting `value`.
    pub fn find(&self, value: &Value) -> Option<&Arc<dyn Handler>> {
        self.handlers.iter().find(|h| h.is_type(value))
    }

    /// The built-in structure handler.
    #[inline]
    pub fn structure(&self) -> &Arc<dyn Handler> {
        &self.structure
    }

    /// Returns `true` if `handler` is the built-in structure handler.
    #[inline]
    pub fn is_structure(&self, handler: &Arc<dyn Handler>) -> bool {
        same_handler(handler, &self.structure)
    }

    /// Handlers in dispatch order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Arc<dyn Handler>> {
        self.handlers.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.handlers.iter().map(|h| h.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    use super::HandlerRegistry;
    use crate::serde::{FnHandler, Handler};
    use crate::value::Value;

    fn named(name: &'static str, priority: Option<f64>) -> Arc<dyn Handler> {
        let handler = FnHandler::new(name, |_| false, |v, _| v.clone(), |d, _, _| d.clone());
        match priority {
            Some(p) => Arc::new(handler.with_priority(p)),
            None => Arc::new(handler),
        }
    }

    fn names(registry: &HandlerRegistry) -> Vec<&str> {
        registry.iter().map(|h| h.name()).collect()
    }

    #[test]
    fn builtin_order() {
        let registry = HandlerRegistry::new();
        assert_eq!(names(&registry), ["sequence", "primitive", "structure"]);
        let handlers: Vec<_> = registry.iter().cloned().collect();
        assert!(registry.is_structure(&handlers[2]));
        assert!(!registry.is_structure(&handlers[0]));
    }

    #[test]
    fn priorities_order_dispatch() {
        let mut registry = HandlerRegistry::new();
        registry.register([named("zero", Some(0.0))]);
        registry.register([named("minus", Some(-1.0))]);
        registry.register([named("plain_a", None), named("plain_b", None)]);
        registry.register([named("five", Some(5.0))]);
        registry.register([named("huge", Some(1e11))]);

        assert_eq!(
            names(&registry),
            [
                "minus",
                "zero",
                "sequence",
                "primitive",
                "five",
                "plain_a",
                "plain_b",
                "huge",
                "structure"
            ]
        );
    }

    #[test]
    fn unregister_by_identity() {
        let mut registry = HandlerRegistry::new();
        let first = named("same", None);
        let second = named("same", None);
        registry.register([first.clone(), second.clone()]);
        registry.unregister([first]);

        assert_eq!(registry.len(), 4);
        assert!(registry.iter().any(|h| Arc::ptr_eq(h, &second)));
    }

    #[test]
    fn empty_keeps_structure_fallback() {
        let registry = HandlerRegistry::empty();
        assert!(registry.is_empty());
        assert!(registry.find(&Value::from(1)).is_none());
        assert_eq!(registry.structure().name(), "structure");
    }
}
