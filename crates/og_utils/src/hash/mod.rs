//! Hash states and the map aliases built on them.
//!
//! - [`FixedHashState`]: seeded [`foldhash`], stable across runs.
//! - [`NoOpHashState`]: identity hashing for numeric ids.

// -----------------------------------------------------------------------------
// Modules

mod fixed;
mod no_op;

// -----------------------------------------------------------------------------
// Exports

pub use fixed::FixedHashState;
pub use no_op::{NoOpHashState, NoOpHasher};

/// A [`hashbrown::HashMap`] using [`FixedHashState`] by default.
///
/// Iteration order only depends on the inserted keys, never on a random seed.
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`] by default.
pub type HashSet<T, S = FixedHashState> = hashbrown::HashSet<T, S>;

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;
