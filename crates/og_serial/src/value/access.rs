use alloc::string::{String, ToString};
use alloc::vec::Vec;

use thiserror::Error;

use crate::value::{Value, ValueKind};

/// Error of a strict [`Value::try_deep_access`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The segment does not exist on the value reached so far.
    #[error("invalid access, check `{segment}` in {kind}")]
    InvalidAccess { segment: String, kind: ValueKind },
}

impl Value {
    /// Reads a nested value through a dot separated path, such as
    /// `"material.color.r"`.
    ///
    /// Empty segments are skipped. Reaching a falsy value ends the walk with
    /// [`Value::Undefined`], and so does a missing segment. List elements
    /// are addressed by index and `length` reads the list length.
    ///
    /// # Examples
    ///
    /// ```
    /// use og_serial::value::Value;
    ///
    /// let root = Value::object([(
    ///     "a",
    ///     Value::object([("b", Value::list([Value::from(10), Value::from(20)]))]),
    /// )]);
    ///
    /// assert_eq!(root.deep_access("a.b.1").as_number(), Some(20.0));
    /// assert_eq!(root.deep_access("a..b.length").as_number(), Some(2.0));
    /// assert!(root.deep_access("a.c.d").is_undefined());
    /// ```
    pub fn deep_access(&self, path: &str) -> Value {
        self.deep_access_segments(path.split('.'))
            .unwrap_or_default()
    }

    /// Like [`deep_access`](Self::deep_access), but a missing segment is
    /// an error instead of [`Value::Undefined`].
    pub fn try_deep_access(&self, path: &str) -> Result<Value, AccessError> {
        let segments: Vec<&str> = path.split('.').collect();
        let mut target = self.clone();
        for segment in segments {
            if !target.is_truthy() {
                return Ok(Value::Undefined);
            }
            if segment.is_empty() {
                continue;
            }
            target = step(&target, segment).ok_or_else(|| AccessError::InvalidAccess {
                segment: segment.to_string(),
                kind: target.kind(),
            })?;
        }
        Ok(target)
    }

    /// Reads a nested value through pre-split path segments.
    ///
    /// Returns `None` on a missing segment.
    pub fn deep_access_segments<'a, I>(&self, segments: I) -> Option<Value>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut target = self.clone();
        for segment in segments {
            if !target.is_truthy() {
                return Some(Value::Undefined);
            }
            if segment.is_empty() {
                continue;
            }
            target = step(&target, segment)?;
        }
        Some(target)
    }
}

fn step(target: &Value, segment: &str) -> Option<Value> {
    match target {
        Value::Object(object) => {
            let object = object.borrow();
            object.field(segment).map(|field| field.value().clone())
        }
        Value::List(list) => {
            if segment == "length" {
                return Some(Value::from(list.len()));
            }
            let index: usize = segment.parse().ok()?;
            (index < list.len()).then(|| list.get(index))
        }
        _ => None,
    }
}
