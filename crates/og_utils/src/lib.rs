//! Shared containers for the `og` crates.
//!
//! - [`hash`]: hash containers with fixed, reproducible hashing.
//! - [`IdMap`]: a map keyed by pre-hashed numeric identifiers.
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod id_map;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use id_map::IdMap;
