//! Procedural macros for mgmt_model

mod entity;
mod shared;
mod subresources;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derives `mgmt_model::entity::Entity`, publishing a static metadata table for the type.
///
/// # Example
///
/// ```ignore
/// #[derive(Entity)]
/// #[entity(resource_type = "console-handler")]
/// pub struct ConsoleHandler {
///     #[key]
///     name: String,
///
///     #[attribute]
///     level: Option<String>,        // bound as `level`
///
///     #[attribute(name = "named-formatter")]
///     formatter: Option<String>,
///
///     #[ancestor]
///     handler: AbstractHandler,     // inherits its tag, key and bindings
///
///     #[subresources]
///     children: HandlerResources,   // derives `Subresources`
/// }
/// ```
///
/// Field attributes:
/// - `#[key]`: the instance name, `String`, `Option<String>` or `&'static str`
/// - `#[attribute]`: an `Option<T: Serialize>` bound under the kebab-case field name,
///   or under `name = "..."` when given
/// - `#[ancestor]`: an embedded entity whose type acts as this type's ancestor
/// - `#[subresources]`: the holder of this entity's child relationships
///
/// Without `#[key]` the key of the `#[ancestor]` is used. Generic structs are rejected.
#[proc_macro_derive(Entity, attributes(entity, key, attribute, ancestor, subresources))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::derive_entity_impl(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derives `mgmt_model::entity::SubresourceHolder` for a struct of child relationships.
///
/// # Example
///
/// ```ignore
/// #[derive(Subresources)]
/// pub struct LoggingResources {
///     console_handlers: Vec<ConsoleHandler>,   // collection accessor
///     root_logger: Option<RootLogger>,         // single accessor
/// }
/// ```
///
/// Accessors keep field order. The marshaller still visits every collection before any
/// single accessor.
#[proc_macro_derive(Subresources)]
pub fn derive_subresources(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    subresources::derive_subresources_impl(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
