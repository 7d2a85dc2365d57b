//! IoT Device Repository
//!
//! Stores device metadata (vendors, protocols, value types, device types,
//! instances, gateways, endpoints) as RDF in a SPARQL 1.1 triple store.
//!
//! # Architecture
//!
//! - [`rdf`]: terms, triples, triple diff and Turtle rendering
//! - [`mapping`]: struct ↔ triple mapping driven by `#[derive(Entity)]`
//! - [`sparql`]: query text generation and result parsing
//! - [`store`]: the [`store::SparqlStore`] gateway (HTTP, embedded)
//! - [`persistence`]: insert / update / select / search operations
//! - [`model`] and [`repository`]: the device repository domain
//! - [`config`]: store settings from files and environment
//!
//! ## Example Usage
//!
//! ```rust
//! use device_repo::mapping::{to_triples, to_triples_no_side_effects};
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
//! #[derive(Entity, Debug, Default, Clone, PartialEq)]
//! #[rdf(entity = "http://example.org/DeviceType", root)]
//! struct DeviceType {
//!     #[rdf(id)]
//!     id: String,
//!     #[rdf(field = "http://example.org/vendor")]
//!     vendor: Vendor,
//! }
//!
//! let device_type = DeviceType {
//!     id: "http://example.org/dt".into(),
//!     vendor: Vendor { id: "http://example.org/v".into(), name: "Acme".into() },
//! };
//!
//! // Insert writes the vendor too
//! assert_eq!(to_triples(&device_type, true).unwrap().triples.len(), 4);
//! // Delete and update only touch the relation to it
//! assert_eq!(to_triples_no_side_effects(&device_type).unwrap().len(), 2);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

extern crate self as device_repo;

pub mod config;
pub mod mapping;
pub mod model;
pub mod persistence;
pub mod rdf;
pub mod repository;
pub mod sparql;
pub mod store;

// Trait and derive macro share the name, like serde's
pub use device_repo_derive::Entity;
pub use mapping::Entity;

pub use config::{Config, ConfigError, ConfigResult};

pub use mapping::{MappingError, MappingResult, Resource};

pub use persistence::{Depth, Persistence, PersistenceError, PersistenceResult};

pub use repository::{DeviceRepository, Dependent};

pub use rdf::{NamedNode, Term, Triple, TripleDiff};

pub use sparql::{Page, QueryBuilder, QueryError, SortOrder};

pub use store::{HttpSparqlStore, SparqlStore, StoreError};

#[cfg(feature = "embedded")]
pub use store::MemoryStore;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
