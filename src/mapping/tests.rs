use super::*;
use crate::rdf::{diff, Term, Triple, RDF_TYPE};
use crate::Entity;

const EX: &str = "http://example.org/";

#[derive(Entity, Debug, Default, Clone, PartialEq)]
#[rdf(entity = "http://example.org/C", root)]
struct C {
    #[rdf(id)]
    id: String,
    #[rdf(field = "http://example.org/cField")]
    field: String,
}

#[derive(Entity, Debug, Default, Clone, PartialEq)]
#[rdf(entity = "http://example.org/B")]
struct B {
    #[rdf(id)]
    id: String,
    #[rdf(field = "http://example.org/bField")]
    field: String,
    #[rdf(field = "http://example.org/bC")]
    c: C,
    #[rdf(field = "http://example.org/bCs")]
    cs: Vec<C>,
}

#[derive(Entity, Debug, Default, Clone, PartialEq)]
#[rdf(entity = "http://example.org/A", root)]
struct A {
    #[rdf(id)]
    id: String,
    #[rdf(field = "http://example.org/aField")]
    field: String,
    #[rdf(field = "http://example.org/aFlag")]
    flag: bool,
    #[rdf(field = "http://example.org/aTag")]
    tags: Vec<String>,
    #[rdf(field = "http://example.org/aLink", reference)]
    link: String,
    #[rdf(field = "http://example.org/aB")]
    b: B,
    #[rdf(field = "http://example.org/aC")]
    child: C,
    #[rdf(field = "http://example.org/aLent", lending)]
    lent: Vec<C>,
    scratch: String,
}

#[derive(Entity, Debug, Default, Clone, PartialEq)]
#[rdf(entity = "http://example.org/Node")]
struct Node {
    #[rdf(id)]
    id: String,
    #[rdf(field = "http://example.org/next")]
    next: Vec<Node>,
}

fn iri(local: &str) -> String {
    format!("{EX}{local}")
}

fn c(local: &str, field: &str) -> C {
    C {
        id: iri(local),
        field: field.to_string(),
    }
}

fn full_a() -> A {
    A {
        id: iri("A"),
        field: "x".into(),
        flag: true,
        tags: vec!["t1".into(), "t2".into()],
        link: iri("elsewhere"),
        b: B {
            id: iri("B"),
            field: "b".into(),
            c: c("B_C", "bc"),
            cs: vec![c("B_C1", "one"), c("B_C2", "two")],
        },
        child: c("A_C", "ac"),
        lent: vec![c("L1", "lent")],
        scratch: String::new(),
    }
}

fn mentions(triples: &[Triple], subject: &str, predicate: &str) -> bool {
    triples.iter().any(|t| {
        t.subject.as_ref().map(Term::value) == Some(subject) && t.predicate.as_str() == predicate
    })
}

fn pred(local: &str) -> String {
    iri(local)
}

#[test]
fn test_round_trip() {
    let a = full_a();
    let encoded = to_triples(&a, true).unwrap();
    assert_eq!(encoded.root.value(), iri("A"));

    let mut decoded = A::default();
    from_triples(&mut decoded, &a.id, &encoded.triples).unwrap();
    assert_eq!(decoded, a);
}

#[test]
fn test_decode_discards_previous_state() {
    let a = full_a();
    let encoded = to_triples(&a, true).unwrap();

    let mut target = A {
        scratch: "left over".into(),
        tags: vec!["stale".into()],
        ..A::default()
    };
    from_triples(&mut target, &a.id, &encoded.triples).unwrap();
    assert_eq!(target.tags, vec!["t1".to_string(), "t2".to_string()]);
    assert!(target.scratch.is_empty());
}

#[test]
fn test_child_triples_precede_relation() {
    let encoded = to_triples(&full_a(), true).unwrap();
    let position = |subject: &str, predicate: &str| {
        encoded
            .triples
            .iter()
            .position(|t| {
                t.subject.as_ref().map(Term::value) == Some(subject)
                    && t.predicate.as_str() == predicate
            })
            .unwrap()
    };
    assert!(position(&iri("A_C"), RDF_TYPE) < position(&iri("A"), &pred("aC")));
}

#[test]
fn test_empty_fields_skipped() {
    let a = A {
        id: iri("A"),
        ..A::default()
    };
    let triples = to_triples_no_side_effects(&a).unwrap();
    assert_eq!(triples.len(), 1);
    assert_eq!(triples[0].predicate.as_str(), RDF_TYPE);
    assert_eq!(triples[0].object.value(), iri("A"));
}

#[test]
fn test_ownership_protection() {
    let triples = to_triples_no_side_effects(&full_a()).unwrap();

    // Nested root: relation only
    assert!(mentions(&triples, &iri("A"), &pred("aC")));
    assert!(!mentions(&triples, &iri("A_C"), RDF_TYPE));
    assert!(!mentions(&triples, &iri("A_C"), &pred("cField")));

    // Nested non-root is owned and serialized, its root children are not
    assert!(mentions(&triples, &iri("B"), &pred("bField")));
    assert!(mentions(&triples, &iri("B"), &pred("bC")));
    assert!(mentions(&triples, &iri("B"), &pred("bCs")));
    assert!(!mentions(&triples, &iri("B_C"), &pred("cField")));
    assert!(!mentions(&triples, &iri("B_C1"), &pred("cField")));
}

#[test]
fn test_outermost_root_always_serialized() {
    let triples = to_triples_no_side_effects(&c("C1", "value")).unwrap();
    assert!(mentions(&triples, &iri("C1"), RDF_TYPE));
    assert!(mentions(&triples, &iri("C1"), &pred("cField")));
}

#[test]
fn test_lending_protection() {
    let a = full_a();
    let owned = to_triples_no_side_effects(&a).unwrap();
    assert!(!owned.iter().any(|t| t.predicate.as_str() == pred("aLent")));
    assert!(!mentions(&owned, &iri("L1"), &pred("cField")));

    let full = to_triples(&a, true).unwrap().triples;
    assert!(mentions(&full, &iri("A"), &pred("aLent")));
    assert!(mentions(&full, &iri("L1"), &pred("cField")));
}

#[test]
fn test_with_lending_keeps_relation_but_not_nested_roots() {
    let a = full_a();
    let lent = to_triples_with_lending(&a).unwrap();
    assert!(mentions(&lent, &iri("A"), &pred("aLent")));
    // L1 and the other nested roots are still only linked
    assert!(!mentions(&lent, &iri("L1"), &pred("cField")));
    assert!(!mentions(&lent, &iri("A_C"), &pred("cField")));

    let owned = to_triples_no_side_effects(&a).unwrap();
    assert!(owned.iter().all(|t| lent.contains(t)));
    assert_eq!(lent.len(), owned.len() + 1);
}

#[test]
fn test_update_isolation_nested_leaf_change() {
    let old = full_a();
    let mut new = old.clone();
    new.child.field = "changed".into();
    new.b.c.field = "changed".into();

    let d = diff(
        &to_triples_no_side_effects(&old).unwrap(),
        &to_triples_no_side_effects(&new).unwrap(),
    );
    assert!(d.is_empty());
}

#[test]
fn test_update_relation_change() {
    let old = full_a();
    let mut new = old.clone();
    new.child = c("Other", "ignored");

    let d = diff(
        &to_triples_no_side_effects(&old).unwrap(),
        &to_triples_no_side_effects(&new).unwrap(),
    );
    assert_eq!(d.remove.len(), 1);
    assert_eq!(d.add.len(), 1);
    assert_eq!(d.remove[0].object.value(), iri("A_C"));
    assert_eq!(d.add[0].object.value(), iri("Other"));
}

#[test]
fn test_update_owned_leaf_change() {
    let old = full_a();
    let mut new = old.clone();
    new.field = "y".into();
    new.b.field = "b2".into();

    let d = diff(
        &to_triples_no_side_effects(&old).unwrap(),
        &to_triples_no_side_effects(&new).unwrap(),
    );
    assert_eq!(d.remove.len(), 2);
    assert_eq!(d.add.len(), 2);
    assert!(d.add.iter().any(|t| t.object.value() == "y"));
    assert!(d.add.iter().any(|t| t.object.value() == "b2"));
}

#[test]
fn test_missing_id_becomes_placeholder() {
    let a = A {
        field: "x".into(),
        ..A::default()
    };
    let encoded = to_triples(&a, true).unwrap();
    assert!(encoded.root.is_variable());
    assert!(encoded
        .triples
        .iter()
        .all(|t| t.subject.as_ref() == Some(&encoded.root)));
}

#[test]
fn test_invalid_id_becomes_placeholder() {
    let a = A {
        id: "not an iri".into(),
        ..A::default()
    };
    assert!(subject_term(&a).is_variable());
}

#[test]
fn test_invalid_reference_dropped() {
    let a = A {
        id: iri("A"),
        link: "no scheme".into(),
        ..A::default()
    };
    let triples = to_triples(&a, true).unwrap().triples;
    assert!(!triples.iter().any(|t| t.predicate.as_str() == pred("aLink")));
}

#[test]
fn test_reference_encoded_as_iri() {
    let triples = to_triples(&full_a(), true).unwrap().triples;
    let link = triples
        .iter()
        .find(|t| t.predicate.as_str() == pred("aLink"))
        .unwrap();
    assert!(link.object.is_iri());
}

#[test]
fn test_empty_list_elements_skipped() {
    let mut a = full_a();
    a.b.cs.insert(0, C::default());
    let triples = to_triples(&a, true).unwrap().triples;
    let relations = triples
        .iter()
        .filter(|t| t.predicate.as_str() == pred("bCs"))
        .count();
    assert_eq!(relations, 2);
    assert!(!triples.iter().any(|t| t.has_variable()));
}

#[test]
fn test_pattern_scoping() {
    let example = A {
        field: "x".into(),
        ..A::default()
    };
    let pattern = Pattern::from_example(&example).unwrap();
    assert!(pattern.root.is_variable());
    assert_eq!(pattern.triples.len(), 2);
    assert!(pattern
        .triples
        .iter()
        .all(|t| t.subject.as_ref() == Some(&pattern.root)));
    assert!(!pattern.triples.iter().any(|t| t.predicate.as_str() == pred("aFlag")));
}

#[test]
fn test_pattern_drops_known_entities() {
    let example = A {
        child: C {
            id: iri("A_C"),
            field: "known".into(),
        },
        ..A::default()
    };
    let pattern = Pattern::from_example(&example).unwrap();

    // `?s aC <A_C>` constrains; the child's own triples do not
    assert!(pattern
        .triples
        .iter()
        .any(|t| t.predicate.as_str() == pred("aC") && t.object.value() == iri("A_C")));
    assert!(!mentions(&pattern.triples, &iri("A_C"), &pred("cField")));
}

#[test]
fn test_pattern_split_text() {
    let example = A {
        field: "lamp".into(),
        flag: true,
        ..A::default()
    };
    let (structural, texts) = Pattern::from_example(&example).unwrap().split_text();
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].pattern, "lamp");
    assert_eq!(texts[0].predicate.as_str(), pred("aField"));
    // rdf:type and the typed boolean stay exact
    assert_eq!(structural.len(), 2);
}

#[test]
fn test_from_triples_list() {
    let first = A {
        id: iri("A1"),
        field: "one".into(),
        ..A::default()
    };
    let second = A {
        id: iri("A2"),
        field: "two".into(),
        ..A::default()
    };
    let mut triples = to_triples(&first, true).unwrap().triples;
    triples.extend(to_triples(&c("C1", "noise"), true).unwrap().triples);
    triples.extend(to_triples(&second, true).unwrap().triples);

    let values = from_triples_list::<A>(&triples).unwrap();
    assert_eq!(values, vec![first, second]);
}

#[test]
fn test_unknown_predicates_ignored() {
    let mut triples = to_triples(&c("C1", "value"), true).unwrap().triples;
    triples.push(Triple::new(
        Term::iri(&iri("C1")).unwrap(),
        oxrdf::NamedNode::new(pred("unknown")).unwrap(),
        Term::literal("whatever"),
    ));

    let mut decoded = C::default();
    from_triples(&mut decoded, &iri("C1"), &triples).unwrap();
    assert_eq!(decoded, c("C1", "value"));
}

#[test]
fn test_absent_child_keeps_id() {
    let triples = to_triples_no_side_effects(&full_a()).unwrap();
    let mut decoded = A::default();
    from_triples(&mut decoded, &iri("A"), &triples).unwrap();
    assert_eq!(decoded.child.id, iri("A_C"));
    assert!(decoded.child.field.is_empty());
}

#[test]
fn test_cycle_guard_terminates() {
    let n1 = Term::iri(&iri("n1")).unwrap();
    let n2 = Term::iri(&iri("n2")).unwrap();
    let next = oxrdf::NamedNode::new(pred("next")).unwrap();
    let triples = vec![
        Triple::new(n1.clone(), next.clone(), n2.clone()),
        Triple::new(n2, next, n1),
    ];

    let mut decoded = Node::default();
    from_triples(&mut decoded, &iri("n1"), &triples).unwrap();
    assert_eq!(decoded.next.len(), 1);
    assert_eq!(decoded.next[0].id, iri("n2"));
    assert_eq!(decoded.next[0].next.len(), 1);
    assert_eq!(decoded.next[0].next[0].id, iri("n1"));
    assert!(decoded.next[0].next[0].next.is_empty());
}

/// Hand-written resource without an id field
#[derive(Default)]
struct Anonymous;

static ANONYMOUS: Descriptor = Descriptor {
    type_name: "Anonymous",
    entity: "http://example.org/Anonymous",
    root: false,
    id_field: None,
    fields: &[],
};

impl Resource for Anonymous {
    fn descriptor(&self) -> &'static Descriptor {
        &ANONYMOUS
    }

    fn id(&self) -> Option<&str> {
        None
    }

    fn set_id(&mut self, _id: String) -> bool {
        false
    }

    fn clear(&mut self) {}

    fn field(&self, _name: &str) -> Option<FieldValue<'_>> {
        None
    }

    fn field_mut(&mut self, _name: &str) -> Option<FieldSlot<'_>> {
        None
    }
}

#[test]
fn test_missing_id_field_is_descriptor_error() {
    assert_eq!(
        to_triples(&Anonymous, true).unwrap_err(),
        MappingError::Descriptor(DescriptorError::MissingIdField {
            type_name: "Anonymous"
        })
    );
    assert!(from_triples(&mut Anonymous, &iri("x"), &[]).is_err());
}

/// Declares a field its accessors do not expose
struct Broken;

static BROKEN_FIELDS: [FieldDescriptor; 1] = [FieldDescriptor {
    name: "missing",
    predicate: "http://example.org/missing",
    kind: FieldKind::Text,
    reference: false,
    lending: false,
}];

static BROKEN: Descriptor = Descriptor {
    type_name: "Broken",
    entity: "http://example.org/Broken",
    root: false,
    id_field: Some("id"),
    fields: &BROKEN_FIELDS,
};

impl Resource for Broken {
    fn descriptor(&self) -> &'static Descriptor {
        &BROKEN
    }

    fn id(&self) -> Option<&str> {
        Some("http://example.org/broken")
    }

    fn set_id(&mut self, _id: String) -> bool {
        true
    }

    fn clear(&mut self) {}

    fn field(&self, _name: &str) -> Option<FieldValue<'_>> {
        None
    }

    fn field_mut(&mut self, _name: &str) -> Option<FieldSlot<'_>> {
        None
    }
}

#[test]
fn test_missing_accessor() {
    assert_eq!(
        to_triples(&Broken, true).unwrap_err(),
        MappingError::missing_field("Broken", "missing")
    );
}
