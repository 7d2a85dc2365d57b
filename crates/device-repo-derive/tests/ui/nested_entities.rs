use device_repo::mapping::FieldKind;
use device_repo::Entity;

#[derive(Entity, Default)]
#[rdf(entity = "http://example.org/Part", root)]
struct Part {
    #[rdf(id)]
    id: String,
    #[rdf(field = "http://example.org/label")]
    label: String,
}

#[derive(Entity, Default)]
#[rdf(entity = "http://example.org/Machine")]
struct Machine {
    #[rdf(id)]
    id: String,
    #[rdf(field = "http://example.org/active")]
    active: bool,
    #[rdf(field = "http://example.org/tags")]
    tags: Vec<String>,
    #[rdf(field = "http://example.org/vendor", reference)]
    vendor: String,
    #[rdf(field = "http://example.org/main")]
    main: Part,
    #[rdf(field = "http://example.org/spare", lending)]
    spares: Vec<Part>,
    notes: String,
}

fn main() {
    let descriptor = Machine::type_descriptor();
    assert_eq!(descriptor.fields.len(), 5);
    assert_eq!(descriptor.fields[3].kind, FieldKind::Entity);
    assert_eq!(descriptor.fields[4].kind, FieldKind::EntityList);
    assert!(Part::type_descriptor().root);
    let _ = Machine::default().notes;
}
