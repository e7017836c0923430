use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Ref, RefCell, RefMut};
use core::fmt;

use crate::value::Value;

// -----------------------------------------------------------------------------
// ListRef

/// A shared handle to an ordered sequence of [`Value`]s.
///
/// Cloning a `ListRef` clones the handle, not the elements: both handles
/// observe the same mutations. Use [`ptr_eq`](Self::ptr_eq) to compare
/// identity.
///
/// # Examples
///
/// ```
/// use og_serial::value::{ListRef, Value};
///
/// let list = ListRef::from_vec(vec![Value::from(1), Value::from(2)]);
/// let alias = list.clone();
/// alias.push(Value::from(3));
///
/// assert_eq!(list.len(), 3);
/// assert!(list.ptr_eq(&alias));
/// ```
#[derive(Clone, Default)]
pub struct ListRef(Rc<RefCell<Vec<Value>>>);

impl ListRef {
    /// Creates an empty list.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a list owning the given elements.
    #[inline]
    pub fn from_vec(values: Vec<Value>) -> Self {
        Self(Rc::new(RefCell::new(values)))
    }

    /// Immutably borrows the elements.
    ///
    /// # Panics
    ///
    /// Panics if the list is currently mutably borrowed.
    #[inline]
    pub fn borrow(&self) -> Ref<'_, Vec<Value>> {
        self.0.borrow()
    }

    /// Mutably borrows the elements.
    ///
    /// # Panics
    ///
    /// Panics if the list is currently borrowed.
    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, Vec<Value>> {
        self.0.borrow_mut()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Returns a clone of the element at `index`, or [`Value::Undefined`]
    /// past the end.
    pub fn get(&self, index: usize) -> Value {
        self.0.borrow().get(index).cloned().unwrap_or_default()
    }

    /// Writes `value` at `index`, padding with [`Value::Undefined`] when
    /// `index` is past the end.
    pub fn set(&self, index: usize, value: Value) {
        let mut values = self.0.borrow_mut();
        if index >= values.len() {
            values.resize(index, Value::Undefined);
            values.push(value);
        } else {
            values[index] = value;
        }
    }

    #[inline]
    pub fn push(&self, value: Value) {
        self.0.borrow_mut().push(value);
    }

    #[inline]
    pub fn truncate(&self, len: usize) {
        self.0.borrow_mut().truncate(len);
    }

    /// Returns a snapshot of the elements.
    ///
    /// Element handles are shared with the list.
    #[inline]
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    /// Returns `true` if both handles point to the same list.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ListRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.borrow().iter()).finish()
    }
}

impl FromIterator<Value> for ListRef {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::ListRef;
    use crate::value::Value;

    #[test]
    fn set_pads_with_undefined() {
        let list = ListRef::new();
        list.set(2, Value::from(7));
        assert_eq!(list.len(), 3);
        assert!(list.get(0).is_undefined());
        assert_eq!(list.get(2).as_number(), Some(7.0));
        assert!(list.get(10).is_undefined());
    }

    #[test]
    fn clones_share_identity() {
        let list: ListRef = [Value::from(1), Value::from(2)].into_iter().collect();
        let other = list.clone();
        other.truncate(1);
        assert_eq!(list.len(), 1);
        assert!(list.ptr_eq(&other));
        assert!(!list.ptr_eq(&ListRef::from_vec(list.to_vec())));
    }
}
