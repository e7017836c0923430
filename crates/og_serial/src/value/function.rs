use alloc::borrow::Cow;
use alloc::rc::Rc;
use core::fmt;

use crate::value::Value;

// -----------------------------------------------------------------------------
// Function

/// A callable value.
///
/// Functions are part of the live object model only: the serializer turns
/// them into [`Value::Undefined`] and the deserializer refuses to write
/// over them.
///
/// Cloning a `Function` shares the underlying closure.
///
/// # Examples
///
/// ```
/// use og_serial::value::{Function, Value};
///
/// let double = Function::new("double", |args| match args.first() {
///     Some(Value::Number(n)) => Value::Number(n * 2.0),
///     _ => Value::Undefined,
/// });
///
/// assert_eq!(double.call(&[Value::Number(2.0)]).as_number(), Some(4.0));
/// assert_eq!(double.name(), "double");
/// ```
#[derive(Clone)]
pub struct Function {
    name: Cow<'static, str>,
    func: Rc<dyn Fn(&[Value]) -> Value>,
}

impl Function {
    /// Wraps a closure as a [`Function`] value.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        func: impl Fn(&[Value]) -> Value + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    /// Returns the debug name of the function.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the function.
    #[inline]
    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }

    /// Returns `true` if both handles point to the same closure.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Function: {}]", self.name)
    }
}
