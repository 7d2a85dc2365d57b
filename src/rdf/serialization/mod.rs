//! Turtle rendering and parsing
//!
//! Rendering embeds triple sets inside generated SPARQL text; parsing reads
//! the Turtle bodies returned for CONSTRUCT queries.

mod turtle;

pub use turtle::{parse_turtle, turtle, turtle_lines};

use thiserror::Error;

/// Parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}

pub type ParseResult<T> = Result<T, ParseError>;
