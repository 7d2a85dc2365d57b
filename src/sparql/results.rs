//! SPARQL query results

use sparesults::{QueryResultsFormat, QueryResultsParser, ReaderQueryResultsParserOutput};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::rdf::{RdfError, Term, Triple};

/// Errors reading a results document
#[derive(Error, Debug)]
pub enum ResultsError {
    /// Document does not parse
    #[error("Malformed results: {0}")]
    Parse(String),

    /// Boolean where bindings were expected, or the reverse
    #[error("Expected {expected} results")]
    UnexpectedForm { expected: &'static str },

    /// A binding holds a term the repository does not model
    #[error(transparent)]
    Term(#[from] RdfError),
}

pub type ResultsResult<T> = Result<T, ResultsError>;

/// SPARQL result format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultFormat {
    /// JSON results
    #[default]
    Json,
    /// XML results
    Xml,
}

impl ResultFormat {
    /// Value for the `Accept` header
    pub fn media_type(self) -> &'static str {
        match self {
            ResultFormat::Json => "application/sparql-results+json",
            ResultFormat::Xml => "application/sparql-results+xml",
        }
    }
}

impl From<ResultFormat> for QueryResultsFormat {
    fn from(format: ResultFormat) -> Self {
        match format {
            ResultFormat::Json => QueryResultsFormat::Json,
            ResultFormat::Xml => QueryResultsFormat::Xml,
        }
    }
}

/// Query solution (variable bindings)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySolution {
    /// Variable name → term bindings
    pub bindings: HashMap<String, Term>,
}

impl QuerySolution {
    /// Create a new query solution
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a binding
    pub fn get(&self, variable: &str) -> Option<&Term> {
        self.bindings.get(variable)
    }

    /// Add a binding
    pub fn bind(&mut self, variable: impl Into<String>, term: Term) {
        self.bindings.insert(variable.into(), term);
    }

    /// Read `?s ?p ?o` as a triple
    fn to_triple(&self) -> Option<Triple> {
        let subject = self.get("s")?.clone();
        let predicate = self.get("p")?.as_iri()?.clone();
        let object = self.get("o")?.clone();
        if !subject.is_iri() {
            return None;
        }
        Some(Triple::new(subject, predicate, object))
    }
}

/// SPARQL query results
#[derive(Debug, Clone, PartialEq)]
pub enum SparqlResults {
    /// Bindings from SELECT query
    Bindings {
        /// Variables
        variables: Vec<String>,
        /// Solutions
        solutions: Vec<QuerySolution>,
    },

    /// Boolean result from ASK query
    Boolean(bool),

    /// Graph from CONSTRUCT/DESCRIBE query
    Graph(Vec<Triple>),
}

impl SparqlResults {
    /// Create empty bindings result
    pub fn empty() -> Self {
        SparqlResults::Bindings {
            variables: Vec::new(),
            solutions: Vec::new(),
        }
    }

    /// Parse a SELECT or ASK response body.
    ///
    /// Bindings holding blank nodes are left out of their solution.
    pub fn parse(body: &[u8], format: ResultFormat) -> ResultsResult<Self> {
        let parser = QueryResultsParser::from_format(format.into());
        let output = parser
            .for_reader(body)
            .map_err(|e| ResultsError::Parse(e.to_string()))?;

        match output {
            ReaderQueryResultsParserOutput::Boolean(value) => Ok(SparqlResults::Boolean(value)),
            ReaderQueryResultsParserOutput::Solutions(reader) => {
                let variables = reader
                    .variables()
                    .iter()
                    .map(|v| v.as_str().to_string())
                    .collect();
                let mut solutions = Vec::new();
                for solution in reader {
                    let solution = solution.map_err(|e| ResultsError::Parse(e.to_string()))?;
                    let mut bound = QuerySolution::new();
                    for (variable, term) in solution.iter() {
                        match Term::try_from(term.clone()) {
                            Ok(term) => bound.bind(variable.as_str(), term),
                            Err(e) => debug!(variable = variable.as_str(), error = %e, "skipping binding"),
                        }
                    }
                    solutions.push(bound);
                }
                Ok(SparqlResults::Bindings {
                    variables,
                    solutions,
                })
            }
        }
    }

    /// Triples of a graph result, or of `?s ?p ?o` bindings.
    ///
    /// Solutions without a usable subject, predicate and object are skipped.
    pub fn into_triples(self) -> ResultsResult<Vec<Triple>> {
        match self {
            SparqlResults::Graph(triples) => Ok(triples),
            SparqlResults::Bindings { solutions, .. } => {
                let total = solutions.len();
                let triples: Vec<Triple> =
                    solutions.iter().filter_map(QuerySolution::to_triple).collect();
                if triples.len() < total {
                    debug!(skipped = total - triples.len(), "incomplete s/p/o solutions");
                }
                Ok(triples)
            }
            SparqlResults::Boolean(_) => Err(ResultsError::UnexpectedForm {
                expected: "triple",
            }),
        }
    }

    /// Answer of an ASK query
    pub fn into_boolean(self) -> ResultsResult<bool> {
        match self {
            SparqlResults::Boolean(value) => Ok(value),
            _ => Err(ResultsError::UnexpectedForm {
                expected: "boolean",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SELECT_BODY: &str = r#"{
        "head": {"vars": ["s", "p", "o"]},
        "results": {"bindings": [
            {
                "s": {"type": "uri", "value": "http://example.org/lamp"},
                "p": {"type": "uri", "value": "http://example.org/name"},
                "o": {"type": "literal", "value": "Lamp"}
            },
            {
                "s": {"type": "uri", "value": "http://example.org/lamp"},
                "p": {"type": "uri", "value": "http://example.org/on"},
                "o": {"type": "literal", "value": "true",
                      "datatype": "http://www.w3.org/2001/XMLSchema#boolean"}
            },
            {
                "s": {"type": "bnode", "value": "b0"},
                "p": {"type": "uri", "value": "http://example.org/name"},
                "o": {"type": "literal", "value": "anonymous"}
            }
        ]}
    }"#;

    #[test]
    fn test_parse_bindings() {
        let results = SparqlResults::parse(SELECT_BODY.as_bytes(), ResultFormat::Json).unwrap();
        match &results {
            SparqlResults::Bindings {
                variables,
                solutions,
            } => {
                assert_eq!(variables, &["s", "p", "o"]);
                assert_eq!(solutions.len(), 3);
                assert!(solutions[2].get("s").is_none());
            }
            other => panic!("Expected bindings, got {other:?}"),
        }

        let triples = results.into_triples().unwrap();
        assert_eq!(triples.len(), 2);
        assert_eq!(triples[0].object.value(), "Lamp");
        assert_eq!(triples[1].object, Term::boolean(true));
    }

    #[test]
    fn test_parse_boolean() {
        let body = br#"{"head": {}, "boolean": true}"#;
        let results = SparqlResults::parse(body, ResultFormat::Json).unwrap();
        assert!(results.clone().into_boolean().unwrap());
        assert!(matches!(
            results.into_triples(),
            Err(ResultsError::UnexpectedForm { .. })
        ));
    }

    #[test]
    fn test_parse_malformed() {
        let result = SparqlResults::parse(b"<html>Internal error</html>", ResultFormat::Json);
        assert!(matches!(result, Err(ResultsError::Parse(_))));
    }

    #[test]
    fn test_empty_results() {
        let results = SparqlResults::empty();
        match results {
            SparqlResults::Bindings {
                variables,
                solutions,
            } => {
                assert!(variables.is_empty());
                assert!(solutions.is_empty());
            }
            _ => panic!("Expected bindings"),
        }
    }
}
