//! Struct ↔ triple mapping
//!
//! Types opt in with `#[derive(Entity)]`, which generates a static
//! [`Descriptor`] plus [`Resource`] accessors. The mapper walks values through
//! those accessors:
//!
//! - [`to_triples`] / [`to_triples_no_side_effects`] serialize, honoring the
//!   root and lending rules
//! - [`from_triples`] / [`from_triples_list`] rebuild values from query results
//! - [`Pattern`] turns an example value into a search pattern
//!
//! # Example
//!
//! ```rust
//! use device_repo::mapping::{from_triples, to_triples};
//! use device_repo::Entity;
//!
//! #[derive(Entity, Debug, Default, Clone, PartialEq)]
//! #[rdf(entity = "http://example.org/Vendor", root)]
//! struct Vendor {
//!     #[rdf(id)]
//!     id: String,
//!     #[rdf(field = "http://example.org/name")]
//!     name: String,
//! }
//!
//! let vendor = Vendor { id: "http://example.org/v1".into(), name: "Acme".into() };
//! let encoded = to_triples(&vendor, true).unwrap();
//! assert_eq!(encoded.triples.len(), 2);
//!
//! let mut decoded = Vendor::default();
//! from_triples(&mut decoded, "http://example.org/v1", &encoded.triples).unwrap();
//! assert_eq!(decoded, vendor);
//! ```

mod decode;
mod descriptor;
mod encode;
mod pattern;
mod resource;

pub use descriptor::{Descriptor, DescriptorError, FieldDescriptor, FieldKind};
pub use resource::{Entity, FieldSlot, FieldValue, Resource, ResourceList};
pub use encode::{subject_term, to_triples, to_triples_no_side_effects, to_triples_with_lending, Encoded};
pub use decode::{from_triples, from_triples_list, group_by_subject, TriplesBySubject};
pub use pattern::{relevant, Pattern, TextConstraint};

use thiserror::Error;

/// Mapping errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// Invalid type metadata
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    /// Descriptor names a field the accessors do not expose
    #[error("{type_name} does not expose mapped field {field}")]
    MissingField {
        type_name: &'static str,
        field: &'static str,
    },

    /// Accessor returned a different shape than the descriptor declares
    #[error("field {field} is declared as {kind:?} but its accessor disagrees")]
    KindMismatch {
        field: &'static str,
        kind: FieldKind,
    },
}

impl MappingError {
    pub(crate) fn missing_field(type_name: &'static str, field: &'static str) -> Self {
        MappingError::MissingField { type_name, field }
    }

    pub(crate) fn kind_mismatch(field: &'static str, kind: FieldKind) -> Self {
        MappingError::KindMismatch { field, kind }
    }
}

pub type MappingResult<T> = Result<T, MappingError>;

#[cfg(test)]
mod tests;
