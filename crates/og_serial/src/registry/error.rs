use alloc::string::String;

use thiserror::Error;

/// Rejected registration call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Properties of plain structures are always serialized.
    #[error("cannot register property `{property_key}` on the plain structure type")]
    RootProperty { property_key: String },
    /// The plain structure type cannot be reconstructed by id.
    #[error("cannot register the plain structure type under class id `{id}`")]
    RootClass { id: String },
    #[error("empty {which} key registered on class `{class}`")]
    EmptyKey { class: String, which: &'static str },
    #[error("empty class id for class `{class}`")]
    EmptyClassId { class: String },
}
