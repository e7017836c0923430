//! Serialization of live object graphs into wire values and back.
//!
//! ## Serialization
//!
//! [`serialize`] turns a live [`Value`] into a wire value: primitives,
//! lists and plain structures only. Instances of registered classes are
//! written through their registered properties and stamped with their class
//! id under [`CLASS_ID_KEY`].
//!
//! ## Deserialization
//!
//! [`deserialize`] reconstructs a wire value, reusing an existing target
//! where possible so references to it stay valid. Class ids found in the
//! data select the class to instantiate, and
//! `{ "resource": pool, "uuid": id }` references resolve to shared values
//! from a [`ResourceMeta`].
//!
//! ## Extension points
//!
//! - [`Handler`]: custom encoding for a kind of value, dispatched by
//!   priority. See [`builtin`] for the handlers installed by default.
//! - [`SerializeHook`] / [`DeserializeHook`]: per-class overrides, set on
//!   the [`ClassBuilder`](crate::info::ClassBuilder).
//!
//! Both receive a [`Context`] and recurse through it.
//!
//! ## Text formats
//!
//! Wire values implement serde's `Serialize` and `Deserialize`, see the
//! `wire` module docs.
//!
//! # Examples
//!
//! ```
//! use og_serial::serde::{deserialize, serialize};
//! use og_serial::value::Value;
//!
//! let value = Value::object([("n", Value::from(f64::NAN)), ("s", Value::from("x"))]);
//! let wire = serialize(&value, None);
//! assert_eq!(wire.get("n").as_str(), Some("NaN"));
//!
//! let back = deserialize(&wire, Value::Undefined, None);
//! assert!(back.deep_eq(&Value::object([("n", Value::from("NaN")), ("s", Value::from("x"))])));
//! ```

/// Logs handler dispatch with the `debug` feature in debug builds.
macro_rules! trace_dispatch {
    ($($arg:tt)*) => {
        #[cfg(all(debug_assertions, feature = "debug"))]
        log::trace!($($arg)*);
    };
}

// -----------------------------------------------------------------------------
// Modules

pub mod builtin;
mod context;
mod de;
mod handler;
mod resource;
mod ser;
mod wire;

// -----------------------------------------------------------------------------
// Exports

pub use context::Context;
pub use handler::{DEFAULT_PRIORITY, FnHandler, Handler};
pub use resource::{RESOURCE_KEY, ResourceMeta, ResourceRef, UUID_KEY};

use crate::value::{ObjectRef, Value};

/// Key under which serialized instances carry their class id.
pub const CLASS_ID_KEY: &str = "serializableClassId";

/// Replaces the default encoding of a class's instances.
///
/// An object result is stamped with the class id.
pub type SerializeHook = fn(&ObjectRef, &Context<'_>) -> Value;

/// Replaces the default reconstruction of a class's instances. Receives the
/// instance to fill and the wire data.
pub type DeserializeHook = fn(&ObjectRef, &Value, &Context<'_>);

// -----------------------------------------------------------------------------
// Entry points

/// Serializes `value` with the [`global`](crate::registry::global) registry.
///
/// The registry's read lock is held for the whole run.
pub fn serialize(value: &Value, meta: Option<&ResourceMeta>) -> Value {
    let registry = crate::registry::global().read();
    Context::new(&registry).with_meta(meta).serialize(value)
}

/// Deserializes `data` into `existing` with the
/// [`global`](crate::registry::global) registry.
///
/// Pass [`Value::Undefined`] as `existing` to build a fresh value.
pub fn deserialize(data: &Value, existing: Value, meta: Option<&ResourceMeta>) -> Value {
    let registry = crate::registry::global().read();
    Context::new(&registry).with_meta(meta).deserialize(data, existing)
}
