//! Entity derive macro implementation

use heck::ToKebabCase;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, DeriveInput, Ident, LitStr, Type};

use crate::shared::{combine, field_ident, named_fields};

/// One `#[attribute]` field
struct BoundField {
    field:         Ident,
    protocol_name: String,
}

/// What the field attributes of the struct declare
#[derive(Default)]
struct EntityFields {
    key:          Option<Ident>,
    ancestor:     Option<(Ident, Type)>,
    subresources: Option<(Ident, Type)>,
    attributes:   Vec<BoundField>,
}

/// Implementation of the Entity derive macro
pub fn derive_entity_impl(input: &DeriveInput) -> syn::Result<TokenStream> {
    let resource_type = parse_resource_type(&input.attrs)?;
    let fields = collect_fields(input)?;

    let struct_name = &input.ident;
    let type_name = struct_name.to_string();

    let resource_type = resource_type.map_or_else(
        || quote! { ::core::option::Option::None },
        |tag| quote! { ::core::option::Option::Some(#tag) },
    );

    let ancestor_descriptor = fields.ancestor.as_ref().map_or_else(
        || quote! { ::core::option::Option::None },
        |(_, ty)| {
            quote! {
                ::core::option::Option::Some(<#ty as ::mgmt_model::entity::Entity>::descriptor)
            }
        },
    );

    let holder_accessors = fields.subresources.as_ref().map_or_else(
        || quote! { ::core::option::Option::None },
        |(_, ty)| {
            quote! {
                ::core::option::Option::Some(
                    <#ty as ::mgmt_model::entity::SubresourceHolder>::accessors
                )
            }
        },
    );

    let readers = fields.attributes.iter().map(|bound| {
        let field = &bound.field;
        let reader = format_ident!("__read_{}", field);
        quote! {
            fn #reader(
                instance: &dyn ::core::any::Any,
            ) -> ::mgmt_model::entity::BindingRead {
                let entity = ::mgmt_model::entity::downcast::<#struct_name>(instance, #type_name)?;
                ::mgmt_model::entity::AttributeValue::to_model_value(&entity.#field)
            }
        }
    });

    let bindings = fields.attributes.iter().map(|bound| {
        let reader = format_ident!("__read_{}", bound.field);
        let name = &bound.protocol_name;
        let field = bound.field.to_string();
        quote! {
            ::mgmt_model::entity::AttributeBinding {
                name:  #name,
                field: #field,
                read:  #reader,
            }
        }
    });

    let key_method = match (&fields.key, &fields.ancestor) {
        (Some(key), _) => quote! {
            fn key(&self) -> ::core::option::Option<&str> {
                ::mgmt_model::entity::AsKey::as_key(&self.#key)
            }
        },
        (None, Some((ancestor, _))) => quote! {
            fn key(&self) -> ::core::option::Option<&str> {
                ::mgmt_model::entity::Entity::key(&self.#ancestor)
            }
        },
        (None, None) => quote! {},
    };

    let ancestor_method = fields.ancestor.as_ref().map(|(ancestor, _)| {
        quote! {
            fn ancestor(&self) -> ::core::option::Option<&dyn ::mgmt_model::entity::Entity> {
                ::core::option::Option::Some(&self.#ancestor)
            }
        }
    });

    let holder_method = fields.subresources.as_ref().map(|(holder, _)| {
        quote! {
            fn subresource_holder(&self) -> ::core::option::Option<&dyn ::core::any::Any> {
                ::core::option::Option::Some(&self.#holder)
            }
        }
    });

    Ok(quote! {
        impl ::mgmt_model::entity::Entity for #struct_name {
            fn descriptor() -> &'static ::mgmt_model::entity::EntityType {
                #(#readers)*

                static BINDINGS: &[::mgmt_model::entity::AttributeBinding] = &[#(#bindings),*];

                static DESCRIPTOR: ::mgmt_model::entity::EntityType =
                    ::mgmt_model::entity::EntityType {
                        name:          #type_name,
                        resource_type: #resource_type,
                        ancestor:      #ancestor_descriptor,
                        bindings:      BINDINGS,
                        subresources:  #holder_accessors,
                    };

                &DESCRIPTOR
            }

            fn entity_type(&self) -> &'static ::mgmt_model::entity::EntityType {
                <Self as ::mgmt_model::entity::Entity>::descriptor()
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            #key_method
            #ancestor_method
            #holder_method
        }
    })
}

/// Read `#[entity(resource_type = "...")]`
fn parse_resource_type(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut resource_type = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("entity")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("resource_type") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(syn::Error::new_spanned(value, "resource_type must not be empty"));
                }
                resource_type = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported entity attribute, expected `resource_type`"))
            }
        })?;
    }
    Ok(resource_type)
}

/// Read the protocol name of an `#[attribute]` field
fn parse_attribute_name(attr: &Attribute, field: &Ident) -> syn::Result<String> {
    let default = field.to_string().to_kebab_case();
    if matches!(attr.meta, syn::Meta::Path(_)) {
        return Ok(default);
    }

    let mut name = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("name") {
            let value: LitStr = meta.value()?.parse()?;
            name = Some(value.value());
            Ok(())
        } else {
            Err(meta.error("unsupported attribute option, expected `name`"))
        }
    })?;
    Ok(name.unwrap_or(default))
}

fn collect_fields(input: &DeriveInput) -> syn::Result<EntityFields> {
    let mut fields = EntityFields::default();
    let mut errors = Vec::new();

    for field in named_fields(input, "Entity")? {
        let ident = field_ident(field)?;

        for attr in &field.attrs {
            let path = attr.path();
            if path.is_ident("key") {
                if fields.key.replace(ident.clone()).is_some() {
                    errors.push(syn::Error::new_spanned(attr, "only one #[key] field is allowed"));
                }
            } else if path.is_ident("ancestor") {
                if fields
                    .ancestor
                    .replace((ident.clone(), field.ty.clone()))
                    .is_some()
                {
                    errors.push(syn::Error::new_spanned(
                        attr,
                        "only one #[ancestor] field is allowed",
                    ));
                }
            } else if path.is_ident("subresources") {
                if fields
                    .subresources
                    .replace((ident.clone(), field.ty.clone()))
                    .is_some()
                {
                    errors.push(syn::Error::new_spanned(
                        attr,
                        "only one #[subresources] field is allowed",
                    ));
                }
            } else if path.is_ident("attribute") {
                match parse_attribute_name(attr, ident) {
                    Ok(protocol_name) => fields.attributes.push(BoundField {
                        field: ident.clone(),
                        protocol_name,
                    }),
                    Err(error) => errors.push(error),
                }
            }
        }
    }

    let mut seen = std::collections::HashSet::new();
    for bound in &fields.attributes {
        if !seen.insert(bound.protocol_name.as_str()) {
            errors.push(syn::Error::new_spanned(
                &bound.field,
                format!("attribute name `{}` is bound twice", bound.protocol_name),
            ));
        }
    }

    combine(errors)?;
    Ok(fields)
}
