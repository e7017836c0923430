use alloc::borrow::Cow;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::LazyLock;

use crate::serde::{DeserializeHook, SerializeHook};
use crate::value::{Object, ObjectRef, Value};

// -----------------------------------------------------------------------------
// Hook types

/// Populates the fields of a freshly created instance.
///
/// Initializers run from the outermost ancestor down to the class itself,
/// so a subclass can override what its parent defined.
pub type Initializer = fn(&mut Object);

/// Initializer of a class that consumes the raw data it is reconstructed
/// from, see [`ClassBuilder::construct_with_data`].
pub type DataInitializer = fn(&mut Object, &Value);

/// Called after a field of an instance changed through
/// [`ObjectRef::assign`] or [`ObjectRef::safe_set`].
pub type ChangeObserver = fn(&ObjectRef, &str, &Value);

// -----------------------------------------------------------------------------
// ClassKey

/// Identity of a [`Class`], stable for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassKey(u64);

impl ClassKey {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ClassKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// -----------------------------------------------------------------------------
// Class

/// A shared class descriptor.
pub type ClassRef = Arc<Class>;

/// Runtime description of a class: its ancestor chain, how to build an
/// instance, and the optional hooks that take over its wire encoding.
///
/// Classes are created with [`Class::builder`]. Every class implicitly
/// descends from [`Class::root`], the plain structure type; the ancestor
/// walk never visits the root.
///
/// # Examples
///
/// ```
/// use og_serial::info::Class;
/// use og_serial::value::Value;
///
/// let shape = Class::builder("Shape")
///     .init(|o| o.define("visible", Value::from(true)))
///     .build();
/// let circle = Class::builder("Circle")
///     .extends(&shape)
///     .init(|o| o.define("radius", Value::from(1)))
///     .build();
///
/// let names: Vec<_> = circle.ancestors().map(|c| c.name()).collect();
/// assert_eq!(names, ["Circle", "Shape"]);
///
/// let instance = Class::instantiate(&circle);
/// assert_eq!(instance.get("visible").as_bool(), Some(true));
/// assert_eq!(instance.get("radius").as_number(), Some(1.0));
/// ```
pub struct Class {
    key: ClassKey,
    name: Cow<'static, str>,
    parent: Option<ClassRef>,
    root: bool,
    init: Option<Initializer>,
    data_init: Option<DataInitializer>,
    serialize_hook: Option<SerializeHook>,
    deserialize_hook: Option<DeserializeHook>,
    observers: Vec<(Cow<'static, str>, ChangeObserver)>,
}

impl Class {
    /// Starts describing a new class.
    #[inline]
    pub fn builder(name: impl Into<Cow<'static, str>>) -> ClassBuilder {
        ClassBuilder::new(name.into())
    }

    /// The plain structure type every class descends from.
    ///
    /// Properties cannot be registered on it: every field of a plain
    /// structure is serialized already.
    pub fn root() -> &'static ClassRef {
        static ROOT: LazyLock<ClassRef> = LazyLock::new(|| {
            let mut builder = ClassBuilder::new(Cow::Borrowed("Object"));
            builder.root = true;
            builder.build()
        });
        &ROOT
    }

    #[inline]
    pub fn key(&self) -> ClassKey {
        self.key
    }

    /// Debug name. Never used on the wire.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn parent(&self) -> Option<&ClassRef> {
        self.parent.as_ref()
    }

    /// Returns `true` for [`Class::root`].
    #[inline]
    pub fn is_root(&self) -> bool {
        self.root
    }

    /// Iterates this class and its ancestors, nearest first, stopping
    /// before the root.
    #[inline]
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            next: (!self.root).then_some(self),
        }
    }

    /// Returns `true` if `other` is this class or one of its ancestors.
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        other.root || self.ancestors().any(|c| c.key == other.key)
    }

    /// The nearest custom serialize hook along the ancestor chain.
    pub fn serialize_hook(&self) -> Option<SerializeHook> {
        self.ancestors().find_map(|c| c.serialize_hook)
    }

    /// The nearest custom deserialize hook along the ancestor chain.
    pub fn deserialize_hook(&self) -> Option<DeserializeHook> {
        self.ancestors().find_map(|c| c.deserialize_hook)
    }

    /// The nearest change observer registered for `key`.
    pub fn change_observer(&self, key: &str) -> Option<ChangeObserver> {
        self.ancestors().find_map(|c| {
            c.observers
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, observer)| *observer)
        })
    }

    /// Returns `true` if reconstruction should hand the raw data to the
    /// constructor, see [`ClassBuilder::construct_with_data`].
    pub fn consumes_data(&self) -> bool {
        self.ancestors().any(|c| c.data_init.is_some())
    }

    /// Creates an instance and runs the initializers of the whole chain.
    pub fn instantiate(this: &ClassRef) -> ObjectRef {
        let mut object = Object::with_class(this.clone());
        Self::run_initializers(this, &mut object);
        ObjectRef::new(object)
    }

    /// Creates an instance, then hands `data` to the nearest data
    /// initializer.
    pub fn instantiate_with_data(this: &ClassRef, data: &Value) -> ObjectRef {
        let mut object = Object::with_class(this.clone());
        Self::run_initializers(this, &mut object);
        if let Some(data_init) = this.ancestors().find_map(|c| c.data_init) {
            data_init(&mut object, data);
        }
        ObjectRef::new(object)
    }

    fn run_initializers(this: &ClassRef, object: &mut Object) {
        let chain: Vec<&Class> = this.ancestors().collect();
        for class in chain.into_iter().rev() {
            if let Some(init) = class.init {
                init(object);
            }
        }
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Ancestors

/// Iterator over a class and its ancestors, see [`Class::ancestors`].
#[derive(Clone)]
pub struct Ancestors<'a> {
    next: Option<&'a Class>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Class;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref().filter(|parent| !parent.root);
        Some(current)
    }
}

// -----------------------------------------------------------------------------
// ClassBuilder

/// Builder of a [`Class`], see [`Class::builder`].
pub struct ClassBuilder {
    name: Cow<'static, str>,
    parent: Option<ClassRef>,
    root: bool,
    init: Option<Initializer>,
    data_init: Option<DataInitializer>,
    serialize_hook: Option<SerializeHook>,
    deserialize_hook: Option<DeserializeHook>,
    observers: Vec<(Cow<'static, str>, ChangeObserver)>,
}

impl ClassBuilder {
    fn new(name: Cow<'static, str>) -> Self {
        Self {
            name,
            parent: None,
            root: false,
            init: None,
            data_init: None,
            serialize_hook: None,
            deserialize_hook: None,
            observers: Vec::new(),
        }
    }

    /// Sets the parent class.
    pub fn extends(mut self, parent: &ClassRef) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Sets the field initializer, the equivalent of a constructor body.
    pub fn init(mut self, init: Initializer) -> Self {
        self.init = Some(init);
        self
    }

    /// Makes reconstruction pass the raw data to `init` after the regular
    /// initializers ran.
    ///
    /// Registered properties are still applied afterwards.
    pub fn construct_with_data(mut self, init: DataInitializer) -> Self {
        self.data_init = Some(init);
        self
    }

    /// Takes over serialization of instances, see [`SerializeHook`].
    pub fn serialize_hook(mut self, hook: SerializeHook) -> Self {
        self.serialize_hook = Some(hook);
        self
    }

    /// Takes over deserialization into instances, see [`DeserializeHook`].
    pub fn deserialize_hook(mut self, hook: DeserializeHook) -> Self {
        self.deserialize_hook = Some(hook);
        self
    }

    /// Calls `observer` whenever the field `key` of an instance changes.
    pub fn on_change(mut self, key: impl Into<Cow<'static, str>>, observer: ChangeObserver) -> Self {
        self.observers.push((key.into(), observer));
        self
    }

    pub fn build(self) -> ClassRef {
        Arc::new(Class {
            key: ClassKey::next(),
            name: self.name,
            parent: self.parent,
            root: self.root,
            init: self.init,
            data_init: self.data_init,
            serialize_hook: self.serialize_hook,
            deserialize_hook: self.deserialize_hook,
            observers: self.observers,
        })
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::Class;
    use crate::value::{ObjectRef, Value};

    #[test]
    fn root_is_never_walked() {
        let root = Class::root();
        assert!(root.is_root());
        assert_eq!(root.ancestors().count(), 0);

        let explicit = Class::builder("Explicit").extends(root).build();
        let names: Vec<_> = explicit.ancestors().map(|c| c.name()).collect();
        assert_eq!(names, ["Explicit"]);
        assert!(explicit.is_subclass_of(root));
    }

    #[test]
    fn initializers_run_parent_first() {
        let base = Class::builder("Base")
            .init(|o| {
                o.define("a", Value::from(1));
                o.define("b", Value::from(1));
            })
            .build();
        let child = Class::builder("Child")
            .extends(&base)
            .init(|o| o.define("b", Value::from(2)))
            .build();

        let object = Class::instantiate(&child);
        assert_eq!(object.get("a").as_number(), Some(1.0));
        assert_eq!(object.get("b").as_number(), Some(2.0));
        assert!(Arc::ptr_eq(&object.class().unwrap(), &child));
        assert!(child.is_subclass_of(&base));
        assert!(!base.is_subclass_of(&child));
    }

    #[test]
    fn data_initializer_sees_raw_data() {
        let class = Class::builder("Raw")
            .construct_with_data(|o, data| o.define("raw", data.get("seed")))
            .build();
        assert!(class.consumes_data());

        let data = Value::object([("seed", Value::from(9))]);
        let object = Class::instantiate_with_data(&class, &data);
        assert_eq!(object.get("raw").as_number(), Some(9.0));
    }

    #[test]
    fn observers_fire_on_change_only() {
        use core::cell::Cell;

        thread_local! {
            static CALLS: Cell<u32> = const { Cell::new(0) };
        }

        let class = Class::builder("Watched")
            .init(|o| o.define("x", Value::from(0)))
            .on_change("x", |_, _, _| CALLS.with(|c| c.set(c.get() + 1)))
            .build();
        let object: ObjectRef = Class::instantiate(&class);

        object.assign("x", Value::from(1));
        object.assign("x", Value::from(1));
        object.safe_set("x", Value::from(2));
        assert_eq!(CALLS.with(Cell::get), 2);
    }
}
