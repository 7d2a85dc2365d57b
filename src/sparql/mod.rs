//! SPARQL query generation and result parsing
//!
//! This module provides:
//! - [`QueryBuilder`]: SPARQL 1.1 text for every repository operation
//! - [`Page`] / [`SortOrder`]: result windows for multi-result queries
//! - [`SparqlResults`]: parsed SELECT/ASK/CONSTRUCT responses
//!
//! # Example
//!
//! ```rust
//! use device_repo::rdf::NamedNode;
//! use device_repo::sparql::{Page, QueryBuilder};
//!
//! let builder = QueryBuilder::new("http://example.org/graph").unwrap();
//! let vendor = NamedNode::new("http://example.org/Vendor").unwrap();
//!
//! let query = builder.list(&vendor, &Page::new(10, 0)).unwrap();
//! assert!(query.contains("LIMIT 10"));
//! assert!(query.contains("<http://example.org/Vendor>"));
//! ```

mod results;
mod templates;

pub use results::{QuerySolution, ResultFormat, ResultsError, ResultsResult, SparqlResults};
pub use templates::{Direction, Page, QueryBuilder, SortOrder};

use thiserror::Error;

/// Query generation errors
#[derive(Error, Debug)]
pub enum QueryError {
    /// A template failed to compile
    #[error("Template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    /// A template failed to render
    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),

    /// Generated text is not valid SPARQL
    #[error("Invalid SPARQL ({message}):\n{text}")]
    Invalid { message: String, text: String },

    /// Caller-supplied option out of range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type QueryResult<T> = Result<T, QueryError>;
