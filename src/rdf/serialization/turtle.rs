//! Turtle format implementation

use super::{ParseError, ParseResult};
use crate::rdf::{Term, Triple};
use oxrdf::{Literal, NamedNode};
use rio_api::parser::TriplesParser;
use rio_turtle::TurtleParser;
use std::io::{BufReader, Cursor};
use tracing::debug;

/// Render each triple as one `S P O .` line
pub fn turtle_lines(triples: &[Triple]) -> Vec<String> {
    triples.iter().map(Triple::to_string).collect()
}

/// Render a triple set as newline-separated Turtle statements
pub fn turtle(triples: &[Triple]) -> String {
    turtle_lines(triples).join("\n")
}

/// Parse a Turtle document into triples.
///
/// Statements involving blank nodes cannot be mapped onto entities and are
/// skipped.
pub fn parse_turtle(input: &str) -> ParseResult<Vec<Triple>> {
    let cursor = Cursor::new(input);
    let mut reader = BufReader::new(cursor);
    let mut parser = TurtleParser::new(&mut reader, None);

    let mut triples = Vec::new();
    let mut skipped = 0usize;

    let res: Result<(), rio_turtle::TurtleError> = parser.parse_all(&mut |t| {
        match convert(t) {
            Ok(Some(triple)) => triples.push(triple),
            Ok(None) => skipped += 1,
            Err(e) => {
                return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()).into())
            }
        }
        Ok(())
    });

    if skipped > 0 {
        debug!(skipped, "ignored blank node statements");
    }

    match res {
        Ok(_) => Ok(triples),
        Err(e) => Err(ParseError::Parse(e.to_string())),
    }
}

fn convert(t: rio_api::model::Triple<'_>) -> Result<Option<Triple>, ParseError> {
    let subject = match t.subject {
        rio_api::model::Subject::NamedNode(n) => Term::Iri(named_node(n.iri)?),
        _ => return Ok(None),
    };
    let predicate = named_node(t.predicate.iri)?;
    let object = match t.object {
        rio_api::model::Term::NamedNode(n) => Term::Iri(named_node(n.iri)?),
        rio_api::model::Term::Literal(l) => Term::Literal(convert_literal(l)?),
        _ => return Ok(None),
    };
    Ok(Some(Triple::new(subject, predicate, object)))
}

fn named_node(iri: &str) -> Result<NamedNode, ParseError> {
    NamedNode::new(iri).map_err(|e| ParseError::Parse(e.to_string()))
}

fn convert_literal(l: rio_api::model::Literal<'_>) -> Result<Literal, ParseError> {
    match l {
        rio_api::model::Literal::Simple { value } => Ok(Literal::new_simple_literal(value)),
        rio_api::model::Literal::LanguageTaggedString { value, language } => {
            Literal::new_language_tagged_literal(value, language)
                .map_err(|e| ParseError::Parse(e.to_string()))
        }
        rio_api::model::Literal::Typed { value, datatype } => {
            Ok(Literal::new_typed_literal(value, named_node(datatype.iri)?))
        }
    }
}
