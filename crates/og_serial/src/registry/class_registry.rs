use alloc::string::ToString;
use alloc::sync::Arc;

use og_utils::IdMap;
use og_utils::hash::HashMap;

use crate::info::{Class, ClassKey, ClassRef};
use crate::registry::RegistrationError;

/// Maps stable class ids to classes.
///
/// Ids are chosen explicitly at registration and never derived from a
/// class name, so renaming a class keeps its wire form valid.
///
/// # Examples
///
/// ```
/// use og_serial::info::Class;
/// use og_serial::registry::ClassRegistry;
///
/// let foo = Class::builder("Foo").build();
/// let mut registry = ClassRegistry::new();
/// registry.register("Foo", &foo).unwrap();
///
/// assert!(registry.resolve("Foo").is_some());
/// assert!(registry.resolve("Bar").is_none());
/// assert_eq!(registry.class_id(&foo), Some("Foo"));
/// ```
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: HashMap<Arc<str>, ClassRef>,
    ids: IdMap<ClassKey, Arc<str>>,
}

impl ClassRegistry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `class` under `id`.
    ///
    /// Registering an id again replaces the previous class and returns it.
    /// A class registered under several ids serializes with the latest one.
    pub fn register(
        &mut self,
        id: &str,
        class: &ClassRef,
    ) -> Result<Option<ClassRef>, RegistrationError> {
        if class.is_root() {
            return Err(RegistrationError::RootClass { id: id.to_string() });
        }
        if id.is_empty() {
            return Err(RegistrationError::EmptyClassId {
                class: class.name().to_string(),
            });
        }

        let id: Arc<str> = Arc::from(id);
        let previous = self.classes.insert(id.clone(), class.clone());
        if let Some(previous) = &previous
            && !Arc::ptr_eq(previous, class)
        {
            if self.ids.get(&previous.key()) == Some(&id) {
                self.ids.remove(&previous.key());
            }
            log::warn!(
                "class id `{id}` re-registered, `{}` replaces `{}`",
                class.name(),
                previous.name(),
            );
        }
        self.ids.insert(class.key(), id);
        Ok(previous)
    }

    /// Looks up the class registered under `id`.
    #[inline]
    pub fn resolve(&self, id: &str) -> Option<&ClassRef> {
        self.classes.get(id)
    }

    /// The id `class` serializes with: its own registered id, or the one
    /// of its nearest registered ancestor.
    pub fn class_id(&self, class: &Class) -> Option<&str> {
        class.ancestors().find_map(|c| self.ids.get(&c.key()).map(|id| &**id))
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.classes.contains_key(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Registered ids in arbitrary order.
    pub fn ids(&self) -> impl ExactSizeIterator<Item = &str> {
        self.classes.keys().map(|id| id.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::ClassRegistry;
    use crate::info::Class;
    use crate::registry::RegistrationError;

    #[test]
    fn last_registration_wins() {
        let first = Class::builder("First").build();
        let second = Class::builder("Second").build();
        let mut registry = ClassRegistry::new();

        assert!(registry.register("shape", &first).unwrap().is_none());
        let replaced = registry.register("shape", &second).unwrap();
        assert!(replaced.is_some_and(|c| Arc::ptr_eq(&c, &first)));
        assert!(Arc::ptr_eq(registry.resolve("shape").unwrap(), &second));
        assert_eq!(registry.len(), 1);
        assert!(registry.class_id(&first).is_none());
        assert_eq!(registry.class_id(&second), Some("shape"));
    }

    #[test]
    fn class_id_is_inherited() {
        let base = Class::builder("Base").build();
        let child = Class::builder("Child").extends(&base).build();
        let mut registry = ClassRegistry::new();

        registry.register("base", &base).unwrap();
        assert_eq!(registry.class_id(&child), Some("base"));
        registry.register("child", &child).unwrap();
        assert_eq!(registry.class_id(&child), Some("child"));
        assert_eq!(registry.class_id(&base), Some("base"));
    }

    #[test]
    fn ids_stay_per_registry() {
        let shared = Class::builder("Shared").build();
        let mut left = ClassRegistry::new();
        let mut right = ClassRegistry::new();
        let empty = ClassRegistry::new();

        left.register("left", &shared).unwrap();
        right.register("right", &shared).unwrap();

        assert_eq!(left.class_id(&shared), Some("left"));
        assert_eq!(right.class_id(&shared), Some("right"));
        assert!(empty.class_id(&shared).is_none());
    }

    #[test]
    fn invalid_registrations() {
        let mut registry = ClassRegistry::new();
        assert!(matches!(
            registry.register("Object", Class::root()),
            Err(RegistrationError::RootClass { .. })
        ));
        assert!(matches!(
            registry.register("", &Class::builder("Nameless").build()),
            Err(RegistrationError::EmptyClassId { .. })
        ));
        assert!(registry.is_empty());
    }
}
