//! Every generated query must be valid SPARQL 1.1

use device_repo::mapping::{to_triples, to_triples_no_side_effects, Pattern};
use device_repo::model::{DeviceType, Service, ValueType, Vendor};
use device_repo::rdf::{diff, NamedNode};
use device_repo::sparql::{Direction, Page, QueryBuilder, SortOrder};
use spargebra::{Query, Update};

const GRAPH: &str = "http://example.org/repository";

fn builder() -> QueryBuilder {
    QueryBuilder::new(GRAPH).unwrap()
}

fn assert_query(text: &str) {
    if let Err(e) = Query::parse(text, None) {
        panic!("invalid query ({e}):\n{text}");
    }
}

fn assert_update(text: &str) {
    if let Err(e) = Update::parse(text, None) {
        panic!("invalid update ({e}):\n{text}");
    }
}

fn device_type() -> DeviceType {
    DeviceType {
        id: "http://example.org/dt/lamp".into(),
        name: "Lamp \"Deluxe\"".into(),
        description: "line one\nline two".into(),
        maintenance: vec!["weekly".into()],
        vendor: Vendor {
            id: "http://example.org/vendor/acme".into(),
            name: "Acme".into(),
        },
        services: vec![Service {
            id: "http://example.org/service/on".into(),
            name: "on".into(),
            url: "switch_on".into(),
            ..Service::default()
        }],
        ..DeviceType::default()
    }
}

#[test]
fn test_write_queries_parse() {
    let b = builder();
    let value = device_type();

    let inserted = to_triples(&value, true).unwrap().triples;
    assert_update(&b.insert(&inserted).unwrap());

    let owned = to_triples_no_side_effects(&value).unwrap();
    assert_update(&b.delete(&owned).unwrap());

    let renamed = DeviceType {
        name: "Lamp".into(),
        ..value.clone()
    };
    let changes = diff(&owned, &to_triples_no_side_effects(&renamed).unwrap());
    assert_update(&b.update(&changes).unwrap());
}

#[test]
fn test_read_queries_parse() {
    let b = builder();
    let id = NamedNode::new("http://example.org/dt/lamp").unwrap();
    let class = NamedNode::new("http://example.org/DeviceType").unwrap();

    assert_query(&b.select(&id).unwrap());
    assert_query(&b.select_deep(&id).unwrap());
    assert_query(&b.id_exists(&id).unwrap());
    assert_query(&b.id_is_of_class(&id, &class).unwrap());
    assert_query(&b.list(&class, &Page::all()).unwrap());
    assert_query(&b.list(&class, &Page::new(10, 20)).unwrap());

    let by_name = Page::new(5, 0).sorted_by(SortOrder::new(
        NamedNode::new("http://example.org/name").unwrap(),
        Direction::Desc,
    ));
    assert_query(&b.list(&class, &by_name).unwrap());
}

#[test]
fn test_search_queries_parse() {
    let b = builder();
    let example = DeviceType {
        name: "Lamp".into(),
        vendor: Vendor {
            name: "Acme".into(),
            ..Vendor::default()
        },
        ..DeviceType::default()
    };
    let pattern = Pattern::from_example(&example).unwrap();
    assert_query(&b.search(&pattern, &Page::new(1, 0)).unwrap());
    assert_query(&b.search(&pattern, &Page::all()).unwrap());

    let variants = [
        Pattern::from_example(&DeviceType {
            description: "bright".into(),
            ..DeviceType::default()
        })
        .unwrap(),
        Pattern::from_example(&DeviceType {
            id: "http://example.org/dt/known".into(),
            ..DeviceType::default()
        })
        .unwrap(),
    ];
    assert_query(&b.variant_search(&pattern, &variants, &Page::all()).unwrap());

    let text = Pattern::from_example(&ValueType {
        name: regex::escape("temp (°C)"),
        ..ValueType::default()
    })
    .unwrap();
    let class = NamedNode::new("http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#ValueType").unwrap();
    let query = b.text_search(&class, text, &[], &Page::new(10, 0)).unwrap();
    assert!(query.contains(r#""temp \\(°C\\)""#));
    assert_query(&query);
}

#[test]
fn test_builder_validation_accepts_own_queries() {
    let b = builder().with_validation(true);
    let value = device_type();
    let inserted = to_triples(&value, true).unwrap().triples;
    assert!(b.insert(&inserted).is_ok());
    assert!(b
        .select_deep(&NamedNode::new("http://example.org/dt/lamp").unwrap())
        .is_ok());
}
