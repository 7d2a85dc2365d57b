use device_repo::Entity;

#[derive(Entity, Default)]
#[rdf(entity = "http://example.org/Note")]
struct Note {
    #[rdf(field = "http://example.org/text")]
    text: String,
}

fn main() {
    assert!(Note::type_descriptor().id_field.is_none());
    assert!(Note::type_descriptor().validate().is_err());
}
