//! Triple → value reconstruction

use indexmap::IndexMap;

use super::{Entity, FieldKind, FieldSlot, MappingError, MappingResult, Resource};
use crate::rdf::{Term, Triple, RDF_TYPE};

/// Triples indexed by subject IRI, in first-appearance order
pub type TriplesBySubject<'a> = IndexMap<&'a str, Vec<&'a Triple>>;

/// Group triples by subject IRI. Pattern triples (placeholder or missing
/// subject) are left out.
pub fn group_by_subject(triples: &[Triple]) -> TriplesBySubject<'_> {
    let mut groups: TriplesBySubject<'_> = IndexMap::new();
    for triple in triples {
        if let Some(Term::Iri(subject)) = &triple.subject {
            groups.entry(subject.as_str()).or_default().push(triple);
        }
    }
    groups
}

/// Rebuild `target` as the entity `id` described by `triples`.
///
/// Every existing field value of `target` is discarded first. Nested values
/// whose triples are absent end up holding only their id.
pub fn from_triples(target: &mut dyn Resource, id: &str, triples: &[Triple]) -> MappingResult<()> {
    let groups = group_by_subject(triples);
    populate(target, id, &groups, &mut Vec::new())
}

/// Decode every subject typed as `T`'s entity class, in result order.
pub fn from_triples_list<T: Entity>(triples: &[Triple]) -> MappingResult<Vec<T>> {
    let descriptor = T::type_descriptor();
    descriptor.validate()?;

    let groups = group_by_subject(triples);
    let mut values = Vec::new();
    for (subject, own) in &groups {
        let typed = own.iter().any(|t| {
            t.predicate.as_str() == RDF_TYPE && t.object.value() == descriptor.entity
        });
        if typed {
            let mut value = T::default();
            populate(&mut value, subject, &groups, &mut Vec::new())?;
            values.push(value);
        }
    }
    Ok(values)
}

fn populate(
    target: &mut dyn Resource,
    id: &str,
    groups: &TriplesBySubject<'_>,
    path: &mut Vec<String>,
) -> MappingResult<()> {
    let descriptor = target.descriptor();
    descriptor.validate()?;

    target.clear();
    target.set_id(id.to_string());

    let Some(own) = groups.get(id) else {
        return Ok(());
    };
    // Already being decoded further up: keep the reference, stop descending.
    if path.iter().any(|visited| visited == id) {
        return Ok(());
    }
    path.push(id.to_string());

    for triple in own {
        let Some(field) = descriptor.field_for_predicate(triple.predicate.as_str()) else {
            continue;
        };
        let object = triple.object.value();
        let Some(slot) = target.field_mut(field.name) else {
            return Err(MappingError::missing_field(descriptor.type_name, field.name));
        };

        match (field.kind, slot) {
            (FieldKind::Text, FieldSlot::Text(text)) => *text = object.to_string(),
            (FieldKind::Bool, FieldSlot::Bool(flag)) => *flag = parse_bool(object),
            (FieldKind::TextList, FieldSlot::TextList(items)) => items.push(object.to_string()),
            (FieldKind::Entity, FieldSlot::Entity(child)) => {
                populate(child, object, groups, path)?;
            }
            (FieldKind::EntityList, FieldSlot::EntityList(items)) => {
                populate(items.push_default(), object, groups, path)?;
            }
            (kind, _) => return Err(MappingError::kind_mismatch(field.name, kind)),
        }
    }

    path.pop();
    Ok(())
}

fn parse_bool(lexical: &str) -> bool {
    matches!(lexical, "true" | "1")
}
