//! Shared utilities for the metadata derive macros

use syn::{Data, DeriveInput, Field, Fields, GenericArgument, Ident, PathArguments, Type};

/// Named fields of a non-generic struct, or an error spanning the offending item
pub fn named_fields<'a>(input: &'a DeriveInput, derive: &str) -> syn::Result<Vec<&'a Field>> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            format!("{derive} cannot be derived for generic types"),
        ));
    }

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            format!("{derive} can only be derived for structs"),
        ));
    };

    match &data.fields {
        Fields::Named(fields) => Ok(fields.named.iter().collect()),
        Fields::Unit => Ok(Vec::new()),
        Fields::Unnamed(fields) => Err(syn::Error::new_spanned(
            fields,
            format!("{derive} requires named fields"),
        )),
    }
}

/// Field identifier; `named_fields` guarantees it exists
pub fn field_ident(field: &Field) -> syn::Result<&Ident> {
    field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))
}

/// Outer type name and first generic argument, e.g. `Vec` and `T` for `Vec<T>`
pub fn wrapper_of(ty: &Type) -> Option<(&Ident, &Type)> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        return None;
    };
    arguments.args.iter().find_map(|argument| match argument {
        GenericArgument::Type(inner) => Some((&segment.ident, inner)),
        _ => None,
    })
}

/// Combine errors from several fields into one
pub fn combine(errors: Vec<syn::Error>) -> syn::Result<()> {
    errors.into_iter().reduce(|mut all, error| {
        all.combine(error);
        all
    })
    .map_or(Ok(()), Err)
}
