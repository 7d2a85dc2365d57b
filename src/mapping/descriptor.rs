//! Static per-type mapping metadata
//!
//! A [`Descriptor`] is generated by `#[derive(Entity)]` and lives in a
//! `static`, so every lookup is free after the first validation.

use oxrdf::NamedNode;
use std::collections::HashSet;
use thiserror::Error;

/// Errors in a type's mapping metadata
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// No field is marked as the id
    #[error("{type_name} has no id field (mark one with #[rdf(id)])")]
    MissingIdField { type_name: &'static str },

    /// The entity class IRI is missing or invalid
    #[error("{type_name} has an invalid entity IRI {entity:?}")]
    InvalidEntity {
        type_name: &'static str,
        entity: &'static str,
    },

    /// A field predicate is not a valid IRI
    #[error("{type_name}.{field} has an invalid predicate IRI {predicate:?}")]
    InvalidPredicate {
        type_name: &'static str,
        field: &'static str,
        predicate: &'static str,
    },

    /// Two fields map to the same predicate
    #[error("{type_name} maps predicate {predicate} more than once")]
    DuplicatePredicate {
        type_name: &'static str,
        predicate: &'static str,
    },

    /// `reference` set on a field that does not hold strings
    #[error("{type_name}.{field} is marked as reference but is not a string field")]
    ReferenceOnNonText {
        type_name: &'static str,
        field: &'static str,
    },
}

/// Shape of a mapped field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `String`: literal, or IRI when the field is a reference
    Text,
    /// `bool`
    Bool,
    /// `Vec<String>`
    TextList,
    /// Nested entity
    Entity,
    /// `Vec` of nested entities
    EntityList,
}

impl FieldKind {
    /// True for kinds that hold nested entities
    pub fn is_nested(self) -> bool {
        matches!(self, FieldKind::Entity | FieldKind::EntityList)
    }
}

/// Mapping metadata of one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Rust field name
    pub name: &'static str,
    /// Predicate IRI
    pub predicate: &'static str,
    pub kind: FieldKind,
    /// String holds an IRI, not a literal
    pub reference: bool,
    /// Relation to an entity owned elsewhere
    pub lending: bool,
}

impl FieldDescriptor {
    /// The predicate as a named node; call after [`Descriptor::validate`]
    pub fn predicate_node(&self) -> NamedNode {
        NamedNode::new_unchecked(self.predicate)
    }
}

/// Mapping metadata of an entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    /// Rust type name, for diagnostics
    pub type_name: &'static str,
    /// RDF class IRI
    pub entity: &'static str,
    /// Aggregate root with an independent lifecycle
    pub root: bool,
    /// Name of the id field
    pub id_field: Option<&'static str>,
    /// Mapped fields in declaration order
    pub fields: &'static [FieldDescriptor],
}

impl Descriptor {
    /// Check the metadata before it is used for any mapping.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.id_field.is_none() {
            return Err(DescriptorError::MissingIdField {
                type_name: self.type_name,
            });
        }
        if self.entity.is_empty() || NamedNode::new(self.entity).is_err() {
            return Err(DescriptorError::InvalidEntity {
                type_name: self.type_name,
                entity: self.entity,
            });
        }

        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in self.fields {
            if NamedNode::new(field.predicate).is_err() {
                return Err(DescriptorError::InvalidPredicate {
                    type_name: self.type_name,
                    field: field.name,
                    predicate: field.predicate,
                });
            }
            if !seen.insert(field.predicate) {
                return Err(DescriptorError::DuplicatePredicate {
                    type_name: self.type_name,
                    predicate: field.predicate,
                });
            }
            if field.reference && !matches!(field.kind, FieldKind::Text | FieldKind::TextList) {
                return Err(DescriptorError::ReferenceOnNonText {
                    type_name: self.type_name,
                    field: field.name,
                });
            }
        }
        Ok(())
    }

    /// The class IRI as a named node; call after [`Descriptor::validate`]
    pub fn entity_node(&self) -> NamedNode {
        NamedNode::new_unchecked(self.entity)
    }

    /// Look up a field by Rust name
    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a field by predicate IRI
    pub fn field_for_predicate(&self, predicate: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.predicate == predicate)
    }
}
