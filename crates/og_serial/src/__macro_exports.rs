//! Items used by the exported macros.

#[cfg(feature = "auto_register")]
pub use inventory;

#[cfg(feature = "auto_register")]
pub use crate::registry::auto_register::AutoRegisterFunc;
