//! Procedural macros for device-repo
//!
//! - `#[derive(Entity)]` - Generate the RDF mapping descriptor and accessors

use proc_macro::TokenStream;

mod entity;

/// Derive the RDF mapping for a struct with named fields.
///
/// Generates `device_repo::mapping::Entity` (a static `Descriptor`) and
/// `device_repo::mapping::Resource` (field accessors used by the mapper).
/// The type must also implement `Default`.
///
/// # Attributes
///
/// - `#[rdf(entity = "...")]` on the struct - RDF class IRI
/// - `#[rdf(root)]` on the struct - aggregate root, never rewritten through a container
/// - `#[rdf(id)]` on one `String` field - the subject IRI
/// - `#[rdf(field = "...")]` on a field - predicate IRI
/// - `#[rdf(field = "...", reference)]` - string field holding an IRI
/// - `#[rdf(field = "...", lending)]` - borrowed relation, left out of deletes and diffs
///
/// Fields without an `rdf` attribute are not mapped. The field kind follows
/// the Rust type: `String`, `bool`, `Vec<String>`, `Vec<T>` of entities,
/// or any other type as a nested entity.
///
/// # Example
///
/// ```ignore
/// #[derive(Entity, Default)]
/// #[rdf(entity = "http://example.org/Vendor", root)]
/// pub struct Vendor {
///     #[rdf(id)]
///     pub id: String,
///     #[rdf(field = "http://example.org/name")]
///     pub name: String,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(rdf))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive_entity_impl(input)
}
