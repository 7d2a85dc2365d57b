//! Query-by-example patterns
//!
//! An example value is serialized with placeholders for every missing id.
//! Only triples that mention a placeholder constrain the search; triples fully
//! made of known terms describe already-identified entities and are dropped.

use super::{to_triples, MappingResult, Resource};
use crate::rdf::{Term, Triple, XSD_STRING};

/// Search pattern derived from an example value
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Term bound to the matched entity
    pub root: Term,
    /// Constraints that mention at least one placeholder
    pub triples: Vec<Triple>,
}

impl Pattern {
    /// Build the exact-match pattern for an example value
    pub fn from_example(example: &dyn Resource) -> MappingResult<Self> {
        let encoded = to_triples(example, true)?;
        Ok(Self {
            root: encoded.root,
            triples: relevant(encoded.triples),
        })
    }

    /// Split into structural constraints and free-text constraints.
    ///
    /// String literals become text constraints; everything else, typed
    /// literals included, stays an exact match.
    pub fn split_text(self) -> (Vec<Triple>, Vec<TextConstraint>) {
        let mut structural = Vec::new();
        let mut texts = Vec::new();
        for triple in self.triples {
            match &triple.object {
                Term::Literal(lit) if lit.datatype().as_str() == XSD_STRING => {
                    texts.push(TextConstraint {
                        subject: triple.subject.clone(),
                        predicate: triple.predicate.clone(),
                        pattern: lit.value().to_string(),
                    });
                }
                _ => structural.push(triple),
            }
        }
        (structural, texts)
    }
}

/// Case-insensitive regular expression match on one literal field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextConstraint {
    pub subject: Option<Term>,
    pub predicate: oxrdf::NamedNode,
    /// Regular expression, already escaped by the caller if it is user input
    pub pattern: String,
}

/// Keep triples where some position is a placeholder.
pub fn relevant(triples: Vec<Triple>) -> Vec<Triple> {
    triples.into_iter().filter(Triple::has_variable).collect()
}
