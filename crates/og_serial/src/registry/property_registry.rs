use alloc::borrow::Cow;
use alloc::string::ToString;
use alloc::vec::Vec;

use og_utils::IdMap;

use crate::info::{Class, ClassKey};
use crate::registry::RegistrationError;

// -----------------------------------------------------------------------------
// PropertyEntry

/// One serialized property of a class: the field it reads and the key it
/// is written under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEntry {
    wire_key: Cow<'static, str>,
    property_key: Cow<'static, str>,
}

impl PropertyEntry {
    #[inline]
    pub fn new(
        wire_key: impl Into<Cow<'static, str>>,
        property_key: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            wire_key: wire_key.into(),
            property_key: property_key.into(),
        }
    }

    /// Key used in the serialized structure.
    #[inline]
    pub fn wire_key(&self) -> &str {
        &self.wire_key
    }

    /// Field name on the instance.
    #[inline]
    pub fn property_key(&self) -> &str {
        &self.property_key
    }
}

// -----------------------------------------------------------------------------
// PropertyRegistry

/// Per-class list of serialized properties.
///
/// Only the entries of the class itself are stored; the engine walks the
/// ancestor chain and reads each ancestor's list separately.
///
/// # Examples
///
/// ```
/// use og_serial::info::Class;
/// use og_serial::registry::PropertyRegistry;
///
/// let base = Class::builder("Base").build();
/// let child = Class::builder("Child").extends(&base).build();
///
/// let mut registry = PropertyRegistry::new();
/// registry.register(&base, "n", "name").unwrap();
/// registry.register(&child, "r", "radius").unwrap();
///
/// assert_eq!(registry.entries(&child).len(), 1);
/// assert_eq!(registry.entries(&base)[0].property_key(), "name");
/// ```
#[derive(Debug, Default)]
pub struct PropertyRegistry {
    table: IdMap<ClassKey, Vec<PropertyEntry>>,
}

impl PropertyRegistry {
    #[inline]
    pub const fn new() -> Self {
        Self {
            table: IdMap::new(),
        }
    }

    /// Appends an entry to the list of `class`.
    ///
    /// Wire keys are not checked for collisions: when two entries share a
    /// wire key, the later one overwrites the earlier one on output.
    pub fn register(
        &mut self,
        class: &Class,
        wire_key: impl Into<Cow<'static, str>>,
        property_key: impl Into<Cow<'static, str>>,
    ) -> Result<(), RegistrationError> {
        let entry = PropertyEntry::new(wire_key, property_key);
        if class.is_root() {
            return Err(RegistrationError::RootProperty {
                property_key: entry.property_key.to_string(),
            });
        }
        for (which, key) in [("wire", &entry.wire_key), ("property", &entry.property_key)] {
            if key.is_empty() {
                return Err(RegistrationError::EmptyKey {
                    class: class.name().to_string(),
                    which,
                });
            }
        }
        self.table.get_or_insert(class.key(), Vec::new).push(entry);
        Ok(())
    }

    /// The entries registered on `class` itself, empty if none.
    #[inline]
    pub fn entries(&self, class: &Class) -> &[PropertyEntry] {
        self.table.get(&class.key()).map_or(&[], Vec::as_slice)
    }

    /// Number of classes with at least one entry.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
