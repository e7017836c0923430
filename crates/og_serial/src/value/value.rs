use alloc::borrow::Cow;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::value::{Function, ListRef, ObjectRef, ValueKind};

// -----------------------------------------------------------------------------
// Value

/// A live value of the dynamic object model.
///
/// `List` and `Object` are shared handles, so cloning a `Value` never
/// copies a container. The wire form produced by the serializer uses the
/// same type restricted to primitives, lists and plain objects.
///
/// # Examples
///
/// ```
/// use og_serial::value::{ObjectRef, Value};
///
/// let object = ObjectRef::plain();
/// let a = Value::from(object.clone());
/// let b = Value::from(object);
///
/// assert!(a.same(&b));
/// assert!(!a.same(&Value::from(og_serial::value::ObjectRef::plain())));
/// assert!(Value::from(f64::NAN).same(&Value::from(f64::NAN)));
/// ```
#[derive(Clone, Default)]
pub enum Value {
    /// Absence of a value. Never overwrites anything on deserialize.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Function(Function),
    List(ListRef),
    Object(ObjectRef),
}

impl Value {
    /// Creates a plain structure value from `(key, value)` pairs.
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<Cow<'static, str>>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Object(ObjectRef::from_fields(fields))
    }

    /// Creates a list value.
    pub fn list<I: IntoIterator<Item = Value>>(values: I) -> Self {
        Self::List(values.into_iter().collect())
    }

    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Undefined => ValueKind::Undefined,
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::Function(_) => ValueKind::Function,
            Self::List(_) => ValueKind::List,
            Self::Object(_) => ValueKind::Object,
        }
    }

    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// `true` for `Undefined` and `Null`.
    #[inline]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    #[inline]
    pub fn is_function(&self) -> bool {
        matches!(self, Self::Function(_))
    }

    /// `true` for lists and objects.
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self, Self::List(_) | Self::Object(_))
    }

    /// Truthiness: `Undefined`, `Null`, `false`, `0`, `NaN` and the empty
    /// string are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Function(_) | Self::List(_) | Self::Object(_) => true,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&ListRef> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns `true` for objects without a class.
    #[inline]
    pub fn is_plain_object(&self) -> bool {
        matches!(self, Self::Object(object) if object.is_plain())
    }

    /// Reads a field of an object, [`Value::Undefined`] otherwise.
    #[inline]
    pub fn get(&self, key: &str) -> Value {
        match self {
            Self::Object(object) => object.get(key),
            _ => Self::Undefined,
        }
    }

    /// The class id held in an object's own field, see [`ObjectRef::class_id`].
    #[inline]
    pub fn class_id(&self) -> Option<Arc<str>> {
        self.as_object().and_then(ObjectRef::class_id)
    }

    /// Identity comparison.
    ///
    /// Containers and functions compare by handle; primitives compare by
    /// value, with `NaN` equal to itself.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => a.ptr_eq(b),
            (Self::List(a), Self::List(b)) => a.ptr_eq(b),
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Structural comparison.
    ///
    /// Lists compare elementwise, objects compare by class identity and by
    /// their field sets regardless of field order. Does not terminate on
    /// cyclic graphs.
    ///
    /// # Examples
    ///
    /// ```
    /// use og_serial::value::Value;
    ///
    /// let a = Value::object([("x", Value::from(1)), ("y", Value::list([Value::Null]))]);
    /// let b = Value::object([("y", Value::list([Value::Null])), ("x", Value::from(1))]);
    ///
    /// assert!(a.deep_eq(&b));
    /// assert!(!a.same(&b));
    /// ```
    pub fn deep_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::List(a), Self::List(b)) => {
                if a.ptr_eq(b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.deep_eq(y))
            }
            (Self::Object(a), Self::Object(b)) => {
                if a.ptr_eq(b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                let same_class = match (a.class(), b.class()) {
                    (None, None) => true,
                    (Some(x), Some(y)) => Arc::ptr_eq(x, y),
                    _ => false,
                };
                same_class
                    && a.len() == b.len()
                    && a.iter().all(|(key, value)| {
                        b.field(key).is_some_and(|field| value.deep_eq(field.value()))
                    })
            }
            _ => self.same(other),
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

macro_rules! impl_from_number {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Value {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::Number(value as f64)
            }
        }
    )*};
}

impl_from_number!(f64, f32, i32, i64, u32, u64, usize);

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Function> for Value {
    #[inline]
    fn from(value: Function) -> Self {
        Self::Function(value)
    }
}

impl From<ListRef> for Value {
    #[inline]
    fn from(value: ListRef) -> Self {
        Self::List(value)
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(value: Vec<Value>) -> Self {
        Self::List(ListRef::from_vec(value))
    }
}

impl From<ObjectRef> for Value {
    #[inline]
    fn from(value: ObjectRef) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Undefined, Into::into)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => fmt::Debug::fmt(b, f),
            Self::Number(n) => fmt::Debug::fmt(n, f),
            Self::String(s) => fmt::Debug::fmt(s, f),
            Self::Function(func) => fmt::Debug::fmt(func, f),
            Self::List(list) => fmt::Debug::fmt(list, f),
            Self::Object(object) => fmt::Debug::fmt(object, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Value;
    use crate::value::{Function, ObjectRef, ValueKind};

    #[test]
    fn truthiness() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::from(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::from(false).is_truthy());
        assert!(Value::from("0").is_truthy());
        assert!(Value::from(-1).is_truthy());
        assert!(Value::list([]).is_truthy());
        assert!(Value::from(ObjectRef::plain()).is_truthy());
    }

    #[test]
    fn same_is_identity_for_containers() {
        let f = Function::new("f", |_| Value::Undefined);
        assert!(Value::from(f.clone()).same(&Value::from(f)));
        assert!(!Value::list([]).same(&Value::list([])));
        assert!(Value::list([]).deep_eq(&Value::list([])));
        assert!(!Value::from(1).same(&Value::from("1")));
    }

    #[test]
    fn deep_eq_checks_field_sets() {
        let a = Value::object([("x", Value::from(1))]);
        let b = Value::object([("x", Value::from(1)), ("y", Value::Undefined)]);
        assert!(!a.deep_eq(&b));
        assert!(!b.deep_eq(&a));
    }

    #[test]
    fn option_conversion() {
        assert!(Value::from(None::<i32>).is_undefined());
        assert_eq!(Value::from(Some("a")).kind(), ValueKind::String);
    }
}
