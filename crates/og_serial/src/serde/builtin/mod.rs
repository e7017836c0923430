//! Handlers installed by [`HandlerRegistry::new`](crate::registry::HandlerRegistry::new).

mod primitive;
mod sequence;
mod structure;

pub use primitive::{NAN, NEG_INFINITY, POS_INFINITY, PrimitiveHandler};
pub use sequence::SequenceHandler;
pub use structure::StructureHandler;
