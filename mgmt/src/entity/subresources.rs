use std::any::Any;
use std::fmt;

use super::{BindingError, Entity};

/// Shape of the relationship an accessor exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    /// An ordered sequence of child entities
    Collection,
    /// At most one child entity
    Single,
}

/// Children returned by one accessor
pub enum Children<'a> {
    /// Collection relationship, in sequence order
    Collection(Vec<&'a dyn Entity>),
    /// Singleton relationship
    Single(Option<&'a dyn Entity>),
}

impl<'a> Children<'a> {
    /// Borrow every element of a collection field
    pub fn collection<T: Entity>(items: &'a [T]) -> Self {
        Self::Collection(items.iter().map(|item| item as &dyn Entity).collect())
    }

    /// Borrow an optional singleton field
    pub fn single<T: Entity>(item: &'a Option<T>) -> Self {
        Self::Single(item.as_ref().map(|item| item as &dyn Entity))
    }
}

/// One child-returning accessor of a subresource holder
pub struct SubresourceAccessor {
    /// Accessor (field) name
    pub name: &'static str,
    /// Collection or single
    pub kind: AccessorKind,
    /// Reads the children from a holder instance
    pub read: for<'a> fn(&'a dyn Any) -> Result<Children<'a>, BindingError>,
}

impl fmt::Debug for SubresourceAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubresourceAccessor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Secondary object grouping an entity's child relationships
///
/// `accessors()` lists the child-returning accessors in declaration order; that order is
/// what the marshaller walks.
pub trait SubresourceHolder: Any + Send + Sync {
    /// Accessor table in declaration order
    fn accessors() -> &'static [SubresourceAccessor]
    where
        Self: Sized;
}
