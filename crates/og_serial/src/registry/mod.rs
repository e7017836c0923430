//! Registration tables consulted by the engine.
//!
//! ## Menu
//!
//! - [`PropertyRegistry`]: which fields of a class are serialized.
//! - [`ClassRegistry`]: class ids to classes and back, per registry.
//! - [`HandlerRegistry`]: prioritized handlers for specific value kinds.
//! - [`Registry`]: the three tables together.
//! - [`RegistryArc`] / [`global`]: the shared process-wide registry.
//!
//! ## auto_register
//!
//! With the `auto_register` feature, registration functions can be
//! submitted statically through [`auto_register!`](crate::auto_register)
//! and are run by [`Registry::auto_register`]. The [`global`] registry does
//! so on first use.

// -----------------------------------------------------------------------------
// Modules

#[cfg(feature = "auto_register")]
pub(crate) mod auto_register;
mod class_registry;
mod error;
mod global;
mod handler_registry;
mod property_registry;
mod registry;

// -----------------------------------------------------------------------------
// Exports

pub use class_registry::ClassRegistry;
pub use error::RegistrationError;
pub use global::{RegistryArc, global};
pub use global::{register_class, register_handler, register_property, unregister_handler};
pub use handler_registry::HandlerRegistry;
pub use property_registry::{PropertyEntry, PropertyRegistry};
pub use registry::Registry;
