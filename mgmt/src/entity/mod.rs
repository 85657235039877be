//! Entity metadata
//!
//! Every model type that can be marshalled implements [`Entity`] and publishes a static
//! [`EntityType`] table: its resource-type tag, an optional ancestor type, its attribute
//! bindings and, optionally, the accessor table of its subresource holder. The tables are
//! normally generated by `#[derive(Entity)]` and `#[derive(Subresources)]`.
//!
//! Rust has no inheritance, so a "subclass" embeds its ancestor as a field marked
//! `#[ancestor]`. Type-level lookups walk [`EntityType::ancestor`]; instance-level reads
//! walk [`Entity::ancestor`] the same number of steps.

mod binding;
mod subresources;

use std::any::Any;

pub use binding::{AsKey, AttributeBinding, AttributeValue, BindingError, BindingRead, downcast};
pub use subresources::{AccessorKind, Children, SubresourceAccessor, SubresourceHolder};

/// Static metadata describing one entity type
#[derive(Debug)]
pub struct EntityType {
    /// Rust type name, for diagnostics
    pub name:          &'static str,
    /// Resource-type tag declared directly on this type
    pub resource_type: Option<&'static str>,
    /// Metadata of the embedded ancestor type, if any
    pub ancestor:      Option<fn() -> &'static EntityType>,
    /// Attribute bindings declared directly on this type, in declaration order
    pub bindings:      &'static [AttributeBinding],
    /// Accessor table of this type's subresource holder, if it has one
    pub subresources:  Option<fn() -> &'static [SubresourceAccessor]>,
}

impl EntityType {
    /// Iterate this type and its ancestors, nearest first
    ///
    /// Stops after [`MAX_HIERARCHY_DEPTH`](crate::constants::MAX_HIERARCHY_DEPTH) levels;
    /// callers treat a chain that long as cyclic.
    pub fn hierarchy(&'static self) -> impl Iterator<Item = &'static Self> {
        std::iter::successors(Some(self), |ty| ty.ancestor.map(|ancestor| ancestor()))
            .take(crate::constants::MAX_HIERARCHY_DEPTH + 1)
    }
}

/// A client-side object representing one configured resource
pub trait Entity: Any + Send + Sync {
    /// Static metadata of the implementing type
    fn descriptor() -> &'static EntityType
    where
        Self: Sized;

    /// Static metadata of this instance's type
    fn entity_type(&self) -> &'static EntityType;

    /// Upcast for binding accessors
    fn as_any(&self) -> &dyn Any;

    /// Instance name used as the last address segment, if the type has one
    fn key(&self) -> Option<&str> {
        None
    }

    /// The embedded ancestor instance, if the type declares one
    fn ancestor(&self) -> Option<&dyn Entity> {
        None
    }

    /// The subresource holder instance, if the type declares one
    fn subresource_holder(&self) -> Option<&dyn Any> {
        None
    }
}

/// Walk `depth` steps up the instance's ancestor chain
pub fn ancestor_at(entity: &dyn Entity, depth: usize) -> Option<&dyn Entity> {
    (0..depth).try_fold(entity, |current, _| current.ancestor())
}
