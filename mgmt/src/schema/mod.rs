//! Resource schema introspection
//!
//! [`SchemaIntrospector::discover`] walks a remote subtree and returns a
//! [`ResourceMetaData`] tree: one node per resource type (or named instance) with its
//! parsed [`ResourceDescription`].

mod description;
mod introspector;
mod metadata;

pub use description::{AttributeMeta, ChildType, ModelType, ResourceDescription};
pub use introspector::SchemaIntrospector;
pub use metadata::ResourceMetaData;
