//! Implementation of #[derive(Entity)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Fields, GenericArgument, Ident, LitStr,
    PathArguments, Type,
};

#[derive(Default)]
struct EntityAttrs {
    entity: Option<LitStr>,
    root: bool,
}

#[derive(Default)]
struct FieldAttrs {
    id: bool,
    predicate: Option<LitStr>,
    reference: bool,
    lending: bool,
}

#[derive(Clone, Copy, PartialEq)]
enum Kind {
    Text,
    Bool,
    TextList,
    Entity,
    EntityList,
}

struct MappedField {
    ident: Ident,
    name: String,
    predicate: LitStr,
    kind: Kind,
    reference: bool,
    lending: bool,
}

pub fn derive_entity_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "#[derive(Entity)] does not support generic types",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "#[derive(Entity)] requires named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "#[derive(Entity)] only works on structs",
            ))
        }
    };

    let entity_attrs = parse_entity_attrs(&input.attrs)?;

    let mut id_field: Option<Ident> = None;
    let mut mapped = Vec::new();

    for field in fields {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new_spanned(field, "unnamed field"))?;
        let attrs = parse_field_attrs(&field.attrs)?;

        if attrs.id {
            if attrs.predicate.is_some() {
                return Err(syn::Error::new_spanned(
                    &ident,
                    "the id field cannot also be a mapped field",
                ));
            }
            if id_field.is_some() {
                return Err(syn::Error::new_spanned(&ident, "duplicate #[rdf(id)] field"));
            }
            if classify(&field.ty) != Kind::Text {
                return Err(syn::Error::new_spanned(
                    &field.ty,
                    "#[rdf(id)] field must be a String",
                ));
            }
            id_field = Some(ident);
            continue;
        }

        match attrs.predicate {
            Some(predicate) => {
                let name = ident.to_string().trim_start_matches("r#").to_string();
                mapped.push(MappedField {
                    ident,
                    name,
                    predicate,
                    kind: classify(&field.ty),
                    reference: attrs.reference,
                    lending: attrs.lending,
                });
            }
            None if attrs.reference || attrs.lending => {
                return Err(syn::Error::new_spanned(
                    &ident,
                    "`reference` and `lending` require `field = \"...\"`",
                ));
            }
            None => {}
        }
    }

    Ok(generate(name, &entity_attrs, id_field.as_ref(), &mapped))
}

fn generate(
    name: &Ident,
    attrs: &EntityAttrs,
    id_field: Option<&Ident>,
    fields: &[MappedField],
) -> TokenStream2 {
    let type_name = name.to_string();
    // Left empty when absent so validation reports it on first use
    let entity = attrs
        .entity
        .as_ref()
        .map(|lit| lit.value())
        .unwrap_or_default();
    let root = attrs.root;

    let id_name = match id_field {
        Some(ident) => {
            let s = ident.to_string();
            quote! { ::core::option::Option::Some(#s) }
        }
        None => quote! { ::core::option::Option::None },
    };

    let descriptors = fields.iter().map(|f| {
        let field_name = &f.name;
        let predicate = &f.predicate;
        let kind = format_ident!("{}", kind_name(f.kind));
        let reference = f.reference;
        let lending = f.lending;
        quote! {
            ::device_repo::mapping::FieldDescriptor {
                name: #field_name,
                predicate: #predicate,
                kind: ::device_repo::mapping::FieldKind::#kind,
                reference: #reference,
                lending: #lending,
            }
        }
    });

    let (id_getter, id_setter) = match id_field {
        Some(ident) => (
            quote! { ::core::option::Option::Some(self.#ident.as_str()) },
            quote! {
                self.#ident = id;
                true
            },
        ),
        None => (
            quote! { ::core::option::Option::None },
            quote! {
                let _ = id;
                false
            },
        ),
    };

    let readers = fields.iter().map(|f| {
        let ident = &f.ident;
        let field_name = &f.name;
        let value = match f.kind {
            Kind::Text => quote! { ::device_repo::mapping::FieldValue::Text(self.#ident.as_str()) },
            Kind::Bool => quote! { ::device_repo::mapping::FieldValue::Bool(self.#ident) },
            Kind::TextList => {
                quote! { ::device_repo::mapping::FieldValue::TextList(self.#ident.as_slice()) }
            }
            Kind::Entity => quote! { ::device_repo::mapping::FieldValue::Entity(&self.#ident) },
            Kind::EntityList => quote! {
                ::device_repo::mapping::FieldValue::EntityList(
                    self.#ident
                        .iter()
                        .map(|item| item as &dyn ::device_repo::mapping::Resource)
                        .collect(),
                )
            },
        };
        quote! { #field_name => ::core::option::Option::Some(#value), }
    });

    let writers = fields.iter().map(|f| {
        let ident = &f.ident;
        let field_name = &f.name;
        let kind = format_ident!("{}", kind_name(f.kind));
        quote! {
            #field_name => ::core::option::Option::Some(
                ::device_repo::mapping::FieldSlot::#kind(&mut self.#ident)
            ),
        }
    });

    quote! {
        impl ::device_repo::mapping::Entity for #name {
            fn type_descriptor() -> &'static ::device_repo::mapping::Descriptor {
                static DESCRIPTOR: ::device_repo::mapping::Descriptor =
                    ::device_repo::mapping::Descriptor {
                        type_name: #type_name,
                        entity: #entity,
                        root: #root,
                        id_field: #id_name,
                        fields: &[#(#descriptors),*],
                    };
                &DESCRIPTOR
            }
        }

        impl ::device_repo::mapping::Resource for #name {
            fn descriptor(&self) -> &'static ::device_repo::mapping::Descriptor {
                <Self as ::device_repo::mapping::Entity>::type_descriptor()
            }

            fn id(&self) -> ::core::option::Option<&str> {
                #id_getter
            }

            fn set_id(&mut self, id: ::std::string::String) -> bool {
                #id_setter
            }

            fn clear(&mut self) {
                *self = ::core::default::Default::default();
            }

            fn field(
                &self,
                name: &str,
            ) -> ::core::option::Option<::device_repo::mapping::FieldValue<'_>> {
                match name {
                    #(#readers)*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_mut(
                &mut self,
                name: &str,
            ) -> ::core::option::Option<::device_repo::mapping::FieldSlot<'_>> {
                match name {
                    #(#writers)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    }
}

fn kind_name(kind: Kind) -> &'static str {
    match kind {
        Kind::Text => "Text",
        Kind::Bool => "Bool",
        Kind::TextList => "TextList",
        Kind::Entity => "Entity",
        Kind::EntityList => "EntityList",
    }
}

fn parse_entity_attrs(attrs: &[Attribute]) -> syn::Result<EntityAttrs> {
    let mut result = EntityAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("rdf")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("entity") {
                result.entity = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("root") {
                result.root = true;
                Ok(())
            } else {
                Err(meta.error("expected `entity = \"...\"` or `root`"))
            }
        })?;
    }
    Ok(result)
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("rdf")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("id") {
                result.id = true;
            } else if meta.path.is_ident("field") {
                result.predicate = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("reference") {
                result.reference = true;
            } else if meta.path.is_ident("lending") {
                result.lending = true;
            } else {
                return Err(meta.error(
                    "expected `id`, `field = \"...\"`, `reference` or `lending`",
                ));
            }
            Ok(())
        })?;
    }
    Ok(result)
}

/// Infer the field kind from the last path segment of its type.
fn classify(ty: &Type) -> Kind {
    let Some((ident, args)) = last_segment(ty) else {
        return Kind::Entity;
    };
    match ident.as_str() {
        "String" => Kind::Text,
        "bool" => Kind::Bool,
        "Vec" => match first_type_arg(args) {
            Some(inner) if classify(inner) == Kind::Text => Kind::TextList,
            _ => Kind::EntityList,
        },
        _ => Kind::Entity,
    }
}

fn last_segment(ty: &Type) -> Option<(String, &PathArguments)> {
    match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .map(|seg| (seg.ident.to_string(), &seg.arguments)),
        _ => None,
    }
}

fn first_type_arg(args: &PathArguments) -> Option<&Type> {
    match args {
        PathArguments::AngleBracketed(angle) => angle.args.iter().find_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        }),
        _ => None,
    }
}
