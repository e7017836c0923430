use alloc::borrow::Cow;
use alloc::rc::Rc;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::{Ref, RefCell, RefMut};
use core::fmt;

use og_utils::hash::HashMap;

use crate::info::ClassRef;
use crate::serde::CLASS_ID_KEY;
use crate::value::Value;

// -----------------------------------------------------------------------------
// Field

/// A named slot of an [`Object`].
#[derive(Clone, Debug)]
pub struct Field {
    value: Value,
    writable: bool,
}

impl Field {
    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns `false` for fields defined through [`Object::define_readonly`].
    #[inline]
    pub fn is_writable(&self) -> bool {
        self.writable
    }
}

// -----------------------------------------------------------------------------
// Object

/// A dynamic structure: an ordered set of named fields, optionally
/// tagged with the [`Class`](crate::info::Class) it is an instance of.
///
/// An object without a class is a *plain structure*. Field order is
/// insertion order, which is also the order the serializer emits keys in.
///
/// Objects are shared through [`ObjectRef`]; this type holds the data.
///
/// # Examples
///
/// ```
/// use og_serial::value::{Object, Value};
///
/// let mut object = Object::new();
/// object.define("x", Value::from(1));
/// object.define_readonly("kind", Value::from("point"));
///
/// assert_eq!(object.len(), 2);
/// assert!(object.is_writable("x"));
/// assert!(!object.is_writable("kind"));
/// assert!(object.is_writable("missing"));
/// ```
#[derive(Default)]
pub struct Object {
    class: Option<ClassRef>,
    fields: Vec<Field>,
    field_names: Vec<Cow<'static, str>>,
    field_indices: HashMap<Cow<'static, str>, usize>,
    use_count: u32,
}

/// Outcome of an attempted field write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Store {
    Rejected,
    Unchanged,
    Changed,
}

impl Object {
    /// Creates an empty plain structure.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty instance of `class`.
    ///
    /// This does not run the class initializers, see
    /// [`Class::instantiate`](crate::info::Class::instantiate).
    #[inline]
    pub fn with_class(class: ClassRef) -> Self {
        Self {
            class: Some(class),
            ..Self::default()
        }
    }

    /// Returns the class of this object, `None` for plain structures.
    #[inline]
    pub fn class(&self) -> Option<&ClassRef> {
        self.class.as_ref()
    }

    #[inline]
    pub fn is_plain(&self) -> bool {
        self.class.is_none()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns `true` if the object has a field named `key`.
    #[inline]
    pub fn has_own(&self, key: &str) -> bool {
        self.field_indices.contains_key(key)
    }

    #[inline]
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.field_indices.get(key).map(|&index| &self.fields[index])
    }

    /// Returns a clone of the field value, [`Value::Undefined`] if absent.
    #[inline]
    pub fn get(&self, key: &str) -> Value {
        self.field(key).map(|f| f.value.clone()).unwrap_or_default()
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.field_names.iter().map(|name| name.as_ref())
    }

    /// `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.field_names
            .iter()
            .zip(self.fields.iter())
            .map(|(name, field)| (name.as_ref(), &field.value))
    }

    /// Defines (or redefines) a writable field.
    ///
    /// Redefinition keeps the original position of the field.
    pub fn define(&mut self, key: impl Into<Cow<'static, str>>, value: Value) {
        self.define_field(key.into(), Field { value, writable: true });
    }

    /// Defines (or redefines) a field that the deserializer and
    /// [`ObjectRef::safe_set`] will never write to.
    pub fn define_readonly(&mut self, key: impl Into<Cow<'static, str>>, value: Value) {
        self.define_field(key.into(), Field { value, writable: false });
    }

    fn define_field(&mut self, key: Cow<'static, str>, field: Field) {
        if let Some(&index) = self.field_indices.get(&key) {
            self.fields[index] = field;
        } else {
            let index = self.fields.len();
            self.field_indices.insert(key.clone(), index);
            self.field_names.push(key);
            self.fields.push(field);
        }
    }

    /// Returns whether a write to `key` would be accepted.
    ///
    /// Only existing read-only fields reject writes; absent fields are
    /// created on write.
    pub fn is_writable(&self, key: &str) -> bool {
        self.field(key).is_none_or(Field::is_writable)
    }

    /// Removes a field, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.field_indices.remove(key)?;
        self.field_names.remove(index);
        let field = self.fields.remove(index);
        for slot in self.field_indices.values_mut() {
            if *slot > index {
                *slot -= 1;
            }
        }
        Some(field.value)
    }

    /// Returns the name of the first field holding `value`, compared with
    /// [`Value::same`].
    pub fn key_of(&self, value: &Value) -> Option<&str> {
        self.iter().find(|(_, v)| v.same(value)).map(|(k, _)| k)
    }

    /// How many times this object was handed out from a resource pool
    /// during deserialization. Zero if never.
    #[inline]
    pub fn use_count(&self) -> u32 {
        self.use_count
    }

    #[inline]
    pub(crate) fn bump_use_count(&mut self) -> u32 {
        self.use_count = self.use_count.saturating_add(1);
        self.use_count
    }

    pub(crate) fn store(&mut self, key: &str, value: Value) -> Store {
        match self.field_indices.get(key) {
            Some(&index) => {
                let field = &mut self.fields[index];
                if !field.writable {
                    Store::Rejected
                } else if field.value.same(&value) {
                    field.value = value;
                    Store::Unchanged
                } else {
                    field.value = value;
                    Store::Changed
                }
            }
            None => {
                self.define_field(Cow::Owned(key.into()), Field { value, writable: true });
                Store::Changed
            }
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.class {
            Some(class) => {
                let mut out = f.debug_struct(class.name());
                for (key, value) in self.iter() {
                    out.field(key, value);
                }
                out.finish()
            }
            None => f.debug_map().entries(self.iter()).finish(),
        }
    }
}

// -----------------------------------------------------------------------------
// ObjectRef

/// A shared handle to an [`Object`].
///
/// Cloning an `ObjectRef` clones the handle; [`ptr_eq`](Self::ptr_eq)
/// compares identity. All writes that should honor field writability and
/// notify change observers go through [`assign`](Self::assign) and
/// [`safe_set`](Self::safe_set).
///
/// # Examples
///
/// ```
/// use og_serial::value::{ObjectRef, Value};
///
/// let point = ObjectRef::from_fields([("x", Value::from(1)), ("y", Value::from(2))]);
/// let alias = point.clone();
/// alias.assign("x", Value::from(5));
///
/// assert_eq!(point.get("x").as_number(), Some(5.0));
/// assert!(point.ptr_eq(&alias));
/// ```
#[derive(Clone, Default)]
pub struct ObjectRef(Rc<RefCell<Object>>);

impl ObjectRef {
    #[inline]
    pub fn new(object: Object) -> Self {
        Self(Rc::new(RefCell::new(object)))
    }

    /// Creates an empty plain structure.
    #[inline]
    pub fn plain() -> Self {
        Self::default()
    }

    /// Creates a plain structure with the given writable fields.
    pub fn from_fields<K, I>(fields: I) -> Self
    where
        K: Into<Cow<'static, str>>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut object = Object::new();
        for (key, value) in fields {
            object.define(key, value);
        }
        Self::new(object)
    }

    /// Immutably borrows the object.
    ///
    /// # Panics
    ///
    /// Panics if the object is currently mutably borrowed.
    #[inline]
    pub fn borrow(&self) -> Ref<'_, Object> {
        self.0.borrow()
    }

    /// Mutably borrows the object.
    ///
    /// Writes through this borrow bypass change observers.
    ///
    /// # Panics
    ///
    /// Panics if the object is currently borrowed.
    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, Object> {
        self.0.borrow_mut()
    }

    /// Returns `true` if both handles point to the same object.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub fn class(&self) -> Option<ClassRef> {
        self.0.borrow().class.clone()
    }

    #[inline]
    pub fn is_plain(&self) -> bool {
        self.0.borrow().is_plain()
    }

    #[inline]
    pub fn get(&self, key: &str) -> Value {
        self.0.borrow().get(key)
    }

    #[inline]
    pub fn has_own(&self, key: &str) -> bool {
        self.0.borrow().has_own(key)
    }

    #[inline]
    pub fn use_count(&self) -> u32 {
        self.0.borrow().use_count
    }

    /// The class id held in the own `serializableClassId` string field.
    ///
    /// Ids registered for the object's class live in a registry, see
    /// [`Context::class_id`](crate::serde::Context::class_id).
    pub fn class_id(&self) -> Option<Arc<str>> {
        match self.0.borrow().field(CLASS_ID_KEY).map(Field::value) {
            Some(Value::String(id)) => Some(Arc::from(id.as_str())),
            _ => None,
        }
    }

    /// Plain assignment: writes `key`, creating the field if absent.
    ///
    /// A write to a read-only field is silently dropped.
    #[inline]
    pub fn assign(&self, key: &str, value: Value) {
        self.safe_set(key, value);
    }

    /// Writes `key` unless it is a read-only field, creating it if absent.
    /// Returns whether the write happened.
    ///
    /// # Examples
    ///
    /// ```
    /// use og_serial::value::{Object, ObjectRef, Value};
    ///
    /// let mut object = Object::new();
    /// object.define("x", Value::from(1));
    /// object.define_readonly("id", Value::from("a"));
    /// let object = ObjectRef::new(object);
    ///
    /// assert!(object.safe_set("x", Value::from(2)));
    /// assert!(!object.safe_set("id", Value::from("b")));
    /// assert!(object.safe_set("y", Value::from(3)));
    /// assert_eq!(object.get("id").as_str(), Some("a"));
    /// ```
    pub fn safe_set(&self, key: &str, value: Value) -> bool {
        // Keep a handle for the observer call, the borrow ends before it runs.
        let observed = value.clone();
        let (store, class) = {
            let mut object = self.0.borrow_mut();
            let store = object.store(key, value);
            (store, object.class.clone())
        };
        if store == Store::Changed
            && let Some(observer) = class.as_ref().and_then(|c| c.change_observer(key))
        {
            observer(self, key, &observed);
        }
        store != Store::Rejected
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(object) => fmt::Debug::fmt(&*object, f),
            Err(_) => f.write_str("[Object <borrowed>]"),
        }
    }
}

// -----------------------------------------------------------------------------
// copy_props

/// Copies the listed fields from `source` to `dest`.
///
/// Undefined source values are skipped and read-only fields of `dest` are
/// left untouched. Absent fields are created.
///
/// # Examples
///
/// ```
/// use og_serial::value::{Object, ObjectRef, Value, copy_props};
///
/// let source = ObjectRef::from_fields([("a", Value::from(1)), ("b", Value::from(2))]);
/// let mut fixed = Object::new();
/// fixed.define("a", Value::from(0));
/// fixed.define_readonly("b", Value::from(0));
/// let dest = ObjectRef::new(fixed);
///
/// copy_props(&source, &dest, &["a", "b", "c"]);
///
/// assert_eq!(dest.get("a").as_number(), Some(1.0));
/// assert_eq!(dest.get("b").as_number(), Some(0.0));
/// assert!(!dest.has_own("c"));
/// ```
pub fn copy_props(source: &ObjectRef, dest: &ObjectRef, keys: &[&str]) {
    for key in keys {
        let value = source.get(key);
        if !value.is_undefined() {
            dest.safe_set(key, value);
        }
    }
}
