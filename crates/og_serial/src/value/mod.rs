//! The live object model the engine reads from and writes into.
//!
//! ## Menu
//!
//! - [`Value`]: a dynamic value, primitive or shared container.
//! - [`ObjectRef`] / [`Object`]: a shared structure with ordered fields,
//!   optionally an instance of a [`Class`](crate::info::Class).
//! - [`ListRef`]: a shared ordered sequence.
//! - [`Function`]: a callable, never serialized.
//! - [`ValueKind`]: the dynamic type of a value.
//! - [`copy_props`], [`Value::deep_access`]: property helpers.

// -----------------------------------------------------------------------------
// Modules

mod access;
mod function;
mod kind;
mod list;
mod object;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use access::AccessError;
pub use function::Function;
pub use kind::ValueKind;
pub use list::ListRef;
pub use object::{Field, Object, ObjectRef, copy_props};
pub use value::Value;
