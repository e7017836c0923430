//! Runtime class descriptors.
//!
//! - [`Class`] / [`ClassRef`]: a class, its ancestor chain and hooks.
//! - [`ClassBuilder`]: builds a class.
//! - [`ClassKey`]: class identity used by the registries.
//! - [`Ancestors`]: the explicit ancestor walk.

// -----------------------------------------------------------------------------
// Modules

mod class;

// -----------------------------------------------------------------------------
// Exports

pub use class::{Ancestors, Class, ClassBuilder, ClassKey, ClassRef};
pub use class::{ChangeObserver, DataInitializer, Initializer};
