//! Value → triple serialization

use oxrdf::NamedNode;

use super::{FieldDescriptor, FieldKind, FieldValue, MappingError, MappingResult, Resource};
use crate::rdf::{Term, Triple, RDF_TYPE};

/// Serialized form of one value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    /// Term standing for the value: its IRI, or a placeholder when it has no usable id
    pub root: Term,
    pub triples: Vec<Triple>,
}

/// Serialize a value.
///
/// With `allow_side_effects` false, nested root entities contribute only the
/// relation triple pointing at them and lending fields are skipped entirely.
/// The outermost value always contributes its own type and attribute triples.
pub fn to_triples(value: &dyn Resource, allow_side_effects: bool) -> MappingResult<Encoded> {
    let mode = if allow_side_effects { Mode::FULL } else { Mode::OWNED };
    encode_with(value, mode)
}

/// Serialize the state a value owns: what delete and update diffs operate on.
pub fn to_triples_no_side_effects(value: &dyn Resource) -> MappingResult<Vec<Triple>> {
    to_triples(value, false).map(|encoded| encoded.triples)
}

/// Owned state plus lending relations and the lent content behind them.
/// Nested root entities still contribute only their relation triple.
pub fn to_triples_with_lending(value: &dyn Resource) -> MappingResult<Vec<Triple>> {
    encode_with(value, Mode::LENDING).map(|encoded| encoded.triples)
}

/// Which side effects a traversal writes
#[derive(Debug, Clone, Copy)]
struct Mode {
    nested_roots: bool,
    lending: bool,
}

impl Mode {
    const FULL: Mode = Mode { nested_roots: true, lending: true };
    const OWNED: Mode = Mode { nested_roots: false, lending: false };
    const LENDING: Mode = Mode { nested_roots: false, lending: true };
}

fn encode_with(value: &dyn Resource, mode: Mode) -> MappingResult<Encoded> {
    let mut triples = Vec::new();
    let root = encode(value, mode, true, &mut triples)?;
    Ok(Encoded { root, triples })
}

/// The term a value serializes to: its id as IRI, or a fresh placeholder.
pub fn subject_term(value: &dyn Resource) -> Term {
    value
        .assigned_id()
        .and_then(|id| Term::iri(id).ok())
        .unwrap_or_else(Term::placeholder)
}

fn encode(
    value: &dyn Resource,
    mode: Mode,
    first: bool,
    triples: &mut Vec<Triple>,
) -> MappingResult<Term> {
    let descriptor = value.descriptor();
    descriptor.validate()?;

    let subject = subject_term(value);

    if mode.nested_roots || first || !descriptor.root {
        triples.push(Triple::new(
            subject.clone(),
            NamedNode::new_unchecked(RDF_TYPE),
            Term::Iri(descriptor.entity_node()),
        ));

        for field in descriptor.fields {
            if field.lending && !mode.lending {
                continue;
            }
            let Some(field_value) = value.field(field.name) else {
                return Err(MappingError::missing_field(descriptor.type_name, field.name));
            };
            encode_field(&subject, field, field_value, mode, triples)?;
        }
    }

    Ok(subject)
}

fn encode_field(
    subject: &Term,
    field: &FieldDescriptor,
    value: FieldValue<'_>,
    mode: Mode,
    triples: &mut Vec<Triple>,
) -> MappingResult<()> {
    if value.is_empty() {
        return Ok(());
    }
    let predicate = field.predicate_node();

    match (field.kind, value) {
        (FieldKind::Text, FieldValue::Text(text)) => {
            if let Some(object) = text_term(text, field.reference) {
                triples.push(Triple::new(subject.clone(), predicate, object));
            }
        }
        (FieldKind::Bool, FieldValue::Bool(flag)) => {
            triples.push(Triple::new(subject.clone(), predicate, Term::boolean(flag)));
        }
        (FieldKind::TextList, FieldValue::TextList(items)) => {
            for object in items.iter().filter_map(|s| text_term(s, field.reference)) {
                triples.push(Triple::new(subject.clone(), predicate.clone(), object));
            }
        }
        (FieldKind::Entity, FieldValue::Entity(child)) => {
            let object = encode(child, mode, false, triples)?;
            triples.push(Triple::new(subject.clone(), predicate, object));
        }
        (FieldKind::EntityList, FieldValue::EntityList(children)) => {
            for child in children {
                if child.is_empty() {
                    continue;
                }
                let object = encode(child, mode, false, triples)?;
                triples.push(Triple::new(subject.clone(), predicate.clone(), object));
            }
        }
        (kind, _) => return Err(MappingError::kind_mismatch(field.name, kind)),
    }
    Ok(())
}

/// References that are not valid IRIs are dropped rather than stored as text.
fn text_term(text: &str, reference: bool) -> Option<Term> {
    if text.is_empty() {
        return None;
    }
    if reference {
        Term::iri(text).ok()
    } else {
        Some(Term::literal(text))
    }
}
