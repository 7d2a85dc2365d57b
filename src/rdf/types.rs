//! RDF term and triple definitions
//!
//! Terms wrap the oxrdf primitives and add the query-time placeholder variable
//! used when a value is turned into a search pattern.

use oxrdf::{Literal, NamedNode, Term as OxTerm, Variable};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

use super::namespace::XSD_BOOLEAN;

/// RDF errors
#[derive(Error, Debug)]
pub enum RdfError {
    /// Invalid IRI
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    /// Invalid literal
    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),

    /// Term kind that cannot be mapped (blank nodes, quoted triples)
    #[error("Unsupported term: {0}")]
    UnsupportedTerm(String),
}

pub type RdfResult<T> = Result<T, RdfError>;

static PLACEHOLDER_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Placeholder ids wrap after this many allocations.
const PLACEHOLDER_WRAP: u64 = 10_000_000;

/// Allocate a fresh query placeholder (`?s1`, `?s2`, ...).
///
/// Safe to call from many tasks at once; every call returns a distinct name
/// until the counter wraps.
pub fn placeholder() -> Variable {
    let id = PLACEHOLDER_COUNTER.fetch_add(1, Ordering::Relaxed) % PLACEHOLDER_WRAP + 1;
    Variable::new_unchecked(format!("s{}", id))
}

/// An RDF term as the mapper sees it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// Identifier of an entity, class or predicate
    Iri(NamedNode),
    /// Plain value
    Literal(Literal),
    /// Query-time placeholder, never persisted
    Variable(Variable),
}

impl Term {
    /// Create an IRI term, validating the IRI
    pub fn iri(iri: &str) -> RdfResult<Self> {
        NamedNode::new(iri)
            .map(Term::Iri)
            .map_err(|e| RdfError::InvalidIri(format!("{}: {}", iri, e)))
    }

    /// Create a plain string literal
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(Literal::new_simple_literal(value))
    }

    /// Create an `xsd:boolean` literal
    pub fn boolean(value: bool) -> Self {
        Term::Literal(Literal::new_typed_literal(
            if value { "true" } else { "false" },
            NamedNode::new_unchecked(XSD_BOOLEAN),
        ))
    }

    /// Create a fresh placeholder variable
    pub fn placeholder() -> Self {
        Term::Variable(placeholder())
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// Get the named node if this is an IRI
    pub fn as_iri(&self) -> Option<&NamedNode> {
        match self {
            Term::Iri(node) => Some(node),
            _ => None,
        }
    }

    /// The bare value: IRI string, literal lexical form or variable name
    pub fn value(&self) -> &str {
        match self {
            Term::Iri(node) => node.as_str(),
            Term::Literal(lit) => lit.value(),
            Term::Variable(var) => var.as_str(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(node) => write!(f, "{}", node),
            Term::Literal(lit) => write!(f, "{}", lit),
            Term::Variable(var) => write!(f, "{}", var),
        }
    }
}

impl From<NamedNode> for Term {
    fn from(node: NamedNode) -> Self {
        Term::Iri(node)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

impl From<Variable> for Term {
    fn from(var: Variable) -> Self {
        Term::Variable(var)
    }
}

impl TryFrom<OxTerm> for Term {
    type Error = RdfError;

    fn try_from(term: OxTerm) -> RdfResult<Self> {
        match term {
            OxTerm::NamedNode(n) => Ok(Term::Iri(n)),
            OxTerm::Literal(l) => Ok(Term::Literal(l)),
            OxTerm::BlankNode(b) => Err(RdfError::UnsupportedTerm(b.to_string())),
            #[allow(unreachable_patterns)]
            other => Err(RdfError::UnsupportedTerm(other.to_string())),
        }
    }
}

/// RDF triple (subject-predicate-object)
///
/// The subject is optional: a subject-less triple is a predicate/object
/// fragment that renders with the generic `?s` subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    /// Subject
    pub subject: Option<Term>,
    /// Predicate
    pub predicate: NamedNode,
    /// Object
    pub object: Term,
}

impl Triple {
    /// Create a new triple
    pub fn new(subject: Term, predicate: NamedNode, object: Term) -> Self {
        Self {
            subject: Some(subject),
            predicate,
            object,
        }
    }

    /// Create a subject-less fragment
    pub fn fragment(predicate: NamedNode, object: Term) -> Self {
        Self {
            subject: None,
            predicate,
            object,
        }
    }

    /// True if subject or object is a placeholder
    pub fn has_variable(&self) -> bool {
        self.object.is_variable() || self.subject.as_ref().map_or(false, Term::is_variable)
    }

    /// Identity key used for set difference: `subject::predicate::object`
    pub fn hash_key(&self) -> String {
        format!("{}::{}::{}", self.subject_text(), self.predicate, self.object)
    }

    fn subject_text(&self) -> String {
        match &self.subject {
            Some(term) => term.to_string(),
            None => "?s".to_string(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject_text(), self.predicate, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_term_rendering() {
        let iri = Term::iri("http://example.org/a").unwrap();
        assert_eq!(iri.to_string(), "<http://example.org/a>");
        assert_eq!(Term::literal("x \"y\"").to_string(), "\"x \\\"y\\\"\"");
        assert_eq!(
            Term::boolean(true).to_string(),
            "\"true\"^^<http://www.w3.org/2001/XMLSchema#boolean>"
        );
        let var = Term::placeholder();
        assert!(var.to_string().starts_with("?s"));
    }

    #[test]
    fn test_invalid_iri() {
        assert!(Term::iri("").is_err());
        assert!(Term::iri("not an iri").is_err());
    }

    #[test]
    fn test_fragment_renders_generic_subject() {
        let p = NamedNode::new("http://example.org/p").unwrap();
        let t = Triple::fragment(p, Term::literal("v"));
        assert_eq!(t.to_string(), "?s <http://example.org/p> \"v\" .");
        assert_eq!(t.hash_key(), "?s::<http://example.org/p>::\"v\"");
    }

    #[test]
    fn test_placeholders_unique_across_threads() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| (0..1000).map(|_| placeholder()).collect::<Vec<_>>()))
            .collect();
        let mut seen = HashSet::new();
        for handle in handles {
            for var in handle.join().unwrap() {
                assert!(seen.insert(var), "duplicate placeholder");
            }
        }
        assert_eq!(seen.len(), 8000);
    }

    #[test]
    fn test_blank_node_rejected() {
        let blank = OxTerm::BlankNode(oxrdf::BlankNode::new_unchecked("b0"));
        assert!(Term::try_from(blank).is_err());
    }
}
