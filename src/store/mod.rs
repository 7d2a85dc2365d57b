//! Triple store gateway
//!
//! [`SparqlStore`] is the only seam between the repository and the database.
//! Implemented by:
//! - [`HttpSparqlStore`]: SPARQL 1.1 protocol over HTTP, with Digest/Basic auth
//! - [`MemoryStore`]: in-process oxigraph store (feature `embedded`)

mod digest;
mod http;
#[cfg(feature = "embedded")]
mod memory;

pub use digest::{Algorithm, Challenge, DigestChallenge};
pub use http::{Credentials, HttpSparqlStore};
#[cfg(feature = "embedded")]
pub use memory::MemoryStore;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::rdf::{ParseError, Triple};
use crate::sparql::ResultsError;

/// Errors talking to the triple store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status
    #[error("Store rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// Credentials missing or refused
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Malformed SELECT/ASK response
    #[error("Results error: {0}")]
    Results(#[from] ResultsError),

    /// Malformed CONSTRUCT response
    #[error("Graph parse error: {0}")]
    Graph(#[from] ParseError),

    /// Endpoint URL does not parse
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// In-process store failure
    #[error("Embedded store error: {0}")]
    Embedded(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Executes SPARQL text against one triple store.
#[async_trait]
pub trait SparqlStore: Send + Sync {
    /// Run a SELECT projecting `?s ?p ?o` and return the rows as triples
    async fn select(&self, query: &str) -> StoreResult<Vec<Triple>>;

    /// Run a CONSTRUCT and return the produced graph
    async fn construct(&self, query: &str) -> StoreResult<Vec<Triple>>;

    /// Run an ASK
    async fn ask(&self, query: &str) -> StoreResult<bool>;

    /// Run a SPARQL update
    async fn update(&self, update: &str) -> StoreResult<()>;
}

#[async_trait]
impl<S: SparqlStore + ?Sized> SparqlStore for Arc<S> {
    async fn select(&self, query: &str) -> StoreResult<Vec<Triple>> {
        (**self).select(query).await
    }

    async fn construct(&self, query: &str) -> StoreResult<Vec<Triple>> {
        (**self).construct(query).await
    }

    async fn ask(&self, query: &str) -> StoreResult<bool> {
        (**self).ask(query).await
    }

    async fn update(&self, update: &str) -> StoreResult<()> {
        (**self).update(update).await
    }
}
