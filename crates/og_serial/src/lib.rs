#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Lets exported macros name `og_serial` inside this crate's own tests.
extern crate self as og_serial;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

pub mod info;
pub mod registry;
pub mod serde;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use registry::{Registry, RegistryArc, global};
pub use serde::{Context, Handler, ResourceMeta, deserialize, serialize};
pub use value::{ListRef, ObjectRef, Value};
