//! RDF primitives for the mapping engine
//!
//! This module provides:
//! - Terms (IRI, literal, placeholder variable) and triples
//! - The set difference used by updates
//! - Turtle rendering for query bodies and parsing for CONSTRUCT results
//!
//! # Example
//!
//! ```rust
//! use device_repo::rdf::{diff, NamedNode, Term, Triple};
//!
//! let name = NamedNode::new("http://example.org/name").unwrap();
//! let lamp = Term::iri("http://example.org/lamp").unwrap();
//!
//! let old = vec![Triple::new(lamp.clone(), name.clone(), Term::literal("Lamp"))];
//! let new = vec![Triple::new(lamp, name, Term::literal("Desk Lamp"))];
//!
//! let d = diff(&old, &new);
//! assert_eq!(d.remove.len(), 1);
//! assert_eq!(d.add.len(), 1);
//! ```

mod diff;
mod namespace;
mod serialization;
mod types;

pub use oxrdf::{Literal, NamedNode, Variable};

pub use types::{placeholder, RdfError, RdfResult, Term, Triple};

pub use diff::{diff, TripleDiff};

pub use namespace::{
    DEFAULT_OVERRIDES, RDF_TYPE, XSD_BOOLEAN, XSD_DECIMAL, XSD_INTEGER, XSD_STRING,
};

pub use serialization::{parse_turtle, turtle, turtle_lines, ParseError, ParseResult};
