//! Persistence facade
//!
//! [`Persistence`] wires the mapper, the query builder and a [`SparqlStore`]
//! into the repository operations:
//! - write: insert, delete, update (diff-based)
//! - select: shallow, deep and level-limited reads
//! - search: list, exact, variant and free-text search
//! - identity: existence checks and id generation
//!
//! # Example
//!
//! ```rust,no_run
//! use device_repo::persistence::Persistence;
//! use device_repo::sparql::QueryBuilder;
//! use device_repo::store::HttpSparqlStore;
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
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = HttpSparqlStore::new("http://localhost:8890/sparql")?;
//! let db = Persistence::new(store, QueryBuilder::new("http://example.org/graph")?);
//!
//! let mut vendor = Vendor { name: "Acme".into(), ..Vendor::default() };
//! db.set_id(&mut vendor).await?;
//! db.insert(&vendor).await?;
//! # Ok(())
//! # }
//! ```

mod identity;
mod search;
mod select;
mod write;

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::config::{Config, ConfigError};
use crate::mapping::{
    Descriptor, DescriptorError, FieldSlot, MappingError, MappingResult, Resource, ResourceList,
};
use crate::rdf::{NamedNode, RdfError, Triple};
use crate::sparql::{QueryBuilder, QueryError};
use crate::store::{SparqlStore, StoreError};

/// Persistence errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Invalid type metadata or accessor mismatch
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Query text could not be produced
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Store round trip failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("RDF error: {0}")]
    Rdf(#[from] RdfError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Single-result search matched nothing
    #[error("No {entity} matches")]
    NotFound { entity: &'static str },

    /// Single-result search matched more than one entity
    #[error("{count} {entity} entities match, expected one")]
    Ambiguous { entity: &'static str, count: usize },

    /// Operation needs the value's id but it is empty or not an IRI
    #[error("{entity} has no usable id")]
    MissingId { entity: &'static str },

    /// A write would persist placeholder variables
    #[error("{entity} contains values without an id; assign ids before writing")]
    Unassigned { entity: &'static str },

    /// A panic inside a resource implementation was recovered
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DescriptorError> for PersistenceError {
    fn from(err: DescriptorError) -> Self {
        PersistenceError::Mapping(err.into())
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// How far [`Persistence::select_level`] follows nested values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// Shallow select, then this many levels of children
    Levels(u32),
    /// Follow every nested value; cycles stop at the first repeated id
    Unlimited,
}

impl Depth {
    /// Depth left for the children, `None` when they are not selected
    pub fn next(self) -> Option<Depth> {
        match self {
            Depth::Levels(0) => None,
            Depth::Levels(n) => Some(Depth::Levels(n - 1)),
            Depth::Unlimited => Some(Depth::Unlimited),
        }
    }
}

impl From<i32> for Depth {
    /// Negative values mean unlimited
    fn from(depth: i32) -> Self {
        u32::try_from(depth).map_or(Depth::Unlimited, Depth::Levels)
    }
}

/// Repository operations against one graph of one store.
///
/// Holds no mutable state; share it by reference (or `Arc`) across tasks.
pub struct Persistence<S> {
    store: S,
    queries: QueryBuilder,
    log_queries: bool,
}

impl<S: SparqlStore> Persistence<S> {
    pub fn new(store: S, queries: QueryBuilder) -> Self {
        Self {
            store,
            queries,
            log_queries: false,
        }
    }

    /// Build the query side from configuration
    pub fn from_config(store: S, config: &Config) -> PersistenceResult<Self> {
        config.validate()?;
        let queries = QueryBuilder::new(config.graph.as_str())?
            .with_overrides(config.overrides_predicate.as_str())
            .with_validation(config.validate_queries);
        info!("Repository graph: {}", config.graph);
        Ok(Self {
            store,
            queries,
            log_queries: config.log_queries,
        })
    }

    /// Log every query text at info level
    pub fn with_query_log(mut self, enabled: bool) -> Self {
        self.log_queries = enabled;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn queries(&self) -> &QueryBuilder {
        &self.queries
    }

    fn log_query(&self, kind: &'static str, text: &str) {
        if self.log_queries {
            info!(kind, graph = self.queries.graph(), "{}", text);
        } else {
            trace!(kind, "{}", text);
        }
    }

    async fn query_triples(&self, kind: &'static str, query: &str) -> PersistenceResult<Vec<Triple>> {
        self.log_query(kind, query);
        let triples = self.store.select(query).await?;
        debug!(kind, rows = triples.len(), "query finished");
        Ok(triples)
    }

    async fn query_graph(&self, kind: &'static str, query: &str) -> PersistenceResult<Vec<Triple>> {
        self.log_query(kind, query);
        let triples = self.store.construct(query).await?;
        debug!(kind, triples = triples.len(), "construct finished");
        Ok(triples)
    }

    async fn query_bool(&self, kind: &'static str, query: &str) -> PersistenceResult<bool> {
        self.log_query(kind, query);
        let answer = self.store.ask(query).await?;
        debug!(kind, answer, "ask finished");
        Ok(answer)
    }

    async fn execute_update(&self, kind: &'static str, update: &str) -> PersistenceResult<()> {
        self.log_query(kind, update);
        self.store.update(update).await?;
        debug!(kind, "update applied");
        Ok(())
    }
}

/// Run mapper code, turning a panic in a resource implementation into an error
pub(crate) fn guarded<T>(f: impl FnOnce() -> MappingResult<T>) -> PersistenceResult<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => Ok(result?),
        Err(panic) => Err(PersistenceError::Internal(panic_message(panic.as_ref()))),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic in resource implementation".to_string()
    }
}

/// The value's id as an IRI
pub(crate) fn required_id(value: &dyn Resource) -> PersistenceResult<NamedNode> {
    let (entity, id) = guarded(|| {
        Ok((
            value.descriptor().type_name,
            value.assigned_id().map(str::to_string),
        ))
    })?;
    id.and_then(|id| NamedNode::new(id).ok())
        .ok_or(PersistenceError::MissingId { entity })
}

pub(crate) fn descriptor_of(value: &dyn Resource) -> PersistenceResult<&'static Descriptor> {
    guarded(|| Ok(value.descriptor()))
}

/// Mutable access to one field of a value being walked
pub(crate) fn field_slot<'v>(value: &'v mut dyn Resource, name: &str) -> PersistenceResult<Option<FieldSlot<'v>>> {
    guarded(move || {
        let value = value;
        Ok(value.field_mut(name))
    })
}

pub(crate) fn list_items<'v>(items: &'v mut dyn ResourceList) -> PersistenceResult<Vec<&'v mut dyn Resource>> {
    guarded(move || {
        let items = items;
        Ok(items.items_mut())
    })
}
