//! Object-graph marshalling
//!
//! Turns a populated entity graph into the ordered list of add operations that rebuilds
//! the same configuration when replayed against the server.
//!
//! Traversal is depth-first and pre-order. Within one parent, every child reached through
//! a collection accessor is emitted before any child reached through a single accessor;
//! the server needs collection resources to exist before the singletons that refer to them.

mod adapter;
mod operation;
mod registry;
mod resolver;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

pub use adapter::EntityAdapter;
pub use operation::{Operation, Verb};
pub use registry::{EntityRegistry, SubresourceLookup};
pub use resolver::{resolve_address, resource_type_of};

use crate::address::ResourceAddress;
use crate::entity::{AccessorKind, Children, Entity, SubresourceAccessor, ancestor_at};
use crate::error::{Error, Result};

/// Report attachment naming the entity that failed and how far its address got
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialAddress {
    /// Entity type being marshalled
    pub type_name: &'static str,
    /// Address resolved so far (the parent's address if the entity's own step failed)
    pub address:   ResourceAddress,
}

impl fmt::Display for PartialAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "while marshalling {} at {}", self.type_name, self.address)
    }
}

/// Converts entity graphs into ordered add operations
#[derive(Debug, Clone, Default)]
pub struct Marshaller {
    registry: Arc<EntityRegistry>,
}

impl Marshaller {
    /// Create a marshaller backed by a shared registry
    pub const fn new(registry: Arc<EntityRegistry>) -> Self {
        Self { registry }
    }

    /// The registry holding this marshaller's caches
    pub const fn registry(&self) -> &Arc<EntityRegistry> {
        &self.registry
    }

    /// Marshal `root` and everything reachable from it
    ///
    /// Either every operation is returned or none is.
    pub fn marshal(&self, root: &dyn Entity) -> Result<Vec<Operation>> {
        let mut operations = Vec::new();
        self.append_node(root, &ResourceAddress::empty(), &mut operations)?;
        debug!(
            "Marshalled {} into {} operations",
            root.entity_type().name,
            operations.len()
        );
        Ok(operations)
    }

    fn append_node(
        &self,
        entity: &dyn Entity,
        parent: &ResourceAddress,
        operations: &mut Vec<Operation>,
    ) -> Result<()> {
        let type_name = entity.entity_type().name;
        let partial = |address: &ResourceAddress| PartialAddress {
            type_name,
            address: address.clone(),
        };

        let address =
            resolve_address(entity, parent).map_err(|report| report.attach(partial(parent)))?;

        let adapter = self
            .registry
            .adapter_for(entity)
            .map_err(|report| report.attach(partial(&address)))?;

        match adapter
            .from_entity(entity)
            .map_err(|report| report.attach(partial(&address)))?
        {
            Some(attributes) => operations.push(Operation::add(address.clone(), attributes)),
            None => trace!("{type_name} at {address} declares no attributes, no add emitted"),
        }

        self.append_subresources(entity, &address, operations)
    }

    fn append_subresources(
        &self,
        entity: &dyn Entity,
        address: &ResourceAddress,
        operations: &mut Vec<Operation>,
    ) -> Result<()> {
        let Some(lookup) = self.registry.subresources_for(entity) else {
            return Ok(());
        };
        let Some(holder) =
            ancestor_at(entity, lookup.depth).and_then(|level| level.subresource_holder())
        else {
            return Ok(());
        };

        // Collections first, then singletons, each in declaration order
        for kind in [AccessorKind::Collection, AccessorKind::Single] {
            for accessor in lookup.accessors.iter().filter(|accessor| accessor.kind == kind) {
                for child in read_children(entity, accessor, holder, address)? {
                    self.append_node(child, address, operations)?;
                }
            }
        }
        Ok(())
    }
}

fn read_children<'a>(
    entity: &dyn Entity,
    accessor: &SubresourceAccessor,
    holder: &'a dyn std::any::Any,
    address: &ResourceAddress,
) -> Result<Vec<&'a dyn Entity>> {
    let children = (accessor.read)(holder).map_err(|e| {
        error_stack::Report::new(Error::adapter(entity.entity_type().name, e))
            .attach(format!("Subresource accessor: {}", accessor.name))
            .attach(PartialAddress {
                type_name: entity.entity_type().name,
                address:   address.clone(),
            })
    })?;

    Ok(match children {
        Children::Collection(items) => items,
        Children::Single(item) => item.into_iter().collect(),
    })
}
