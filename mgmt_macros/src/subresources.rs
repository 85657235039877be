//! Subresources derive macro implementation

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::DeriveInput;

use crate::shared::{combine, field_ident, named_fields, wrapper_of};

/// Implementation of the Subresources derive macro
///
/// `Vec<T>` fields become collection accessors and `Option<T>` fields single accessors,
/// in field order.
pub fn derive_subresources_impl(input: &DeriveInput) -> syn::Result<TokenStream> {
    let struct_name = &input.ident;
    let type_name = struct_name.to_string();

    let mut readers = Vec::new();
    let mut accessors = Vec::new();
    let mut errors = Vec::new();

    for field in named_fields(input, "Subresources")? {
        let ident = field_ident(field)?;
        let (kind, constructor) = match wrapper_of(&field.ty) {
            Some((wrapper, _)) if wrapper == "Vec" => (quote! { Collection }, quote! { collection }),
            Some((wrapper, _)) if wrapper == "Option" => (quote! { Single }, quote! { single }),
            _ => {
                errors.push(syn::Error::new_spanned(
                    &field.ty,
                    "subresource fields must be `Vec<T>` or `Option<T>` of an entity type",
                ));
                continue;
            }
        };

        let reader = format_ident!("__children_{}", ident);
        let name = ident.to_string();

        readers.push(quote! {
            fn #reader(
                instance: &dyn ::core::any::Any,
            ) -> ::core::result::Result<
                ::mgmt_model::entity::Children<'_>,
                ::mgmt_model::entity::BindingError,
            > {
                let holder = ::mgmt_model::entity::downcast::<#struct_name>(instance, #type_name)?;
                ::core::result::Result::Ok(::mgmt_model::entity::Children::#constructor(&holder.#ident))
            }
        });

        accessors.push(quote! {
            ::mgmt_model::entity::SubresourceAccessor {
                name: #name,
                kind: ::mgmt_model::entity::AccessorKind::#kind,
                read: #reader,
            }
        });
    }

    combine(errors)?;

    Ok(quote! {
        impl ::mgmt_model::entity::SubresourceHolder for #struct_name {
            fn accessors() -> &'static [::mgmt_model::entity::SubresourceAccessor] {
                #(#readers)*

                static ACCESSORS: &[::mgmt_model::entity::SubresourceAccessor] = &[#(#accessors),*];

                ACCESSORS
            }
        }
    })
}
