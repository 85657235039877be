use serde::Serialize;

use super::ResourceDescription;
use crate::address::AddressTemplate;

/// One node of a discovered schema tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceMetaData {
    address:     AddressTemplate,
    description: ResourceDescription,
    children:    Vec<ResourceMetaData>,
}

impl ResourceMetaData {
    /// Create a node
    pub const fn new(
        address: AddressTemplate,
        description: ResourceDescription,
        children: Vec<Self>,
    ) -> Self {
        Self {
            address,
            description,
            children,
        }
    }

    /// Template this node was discovered at
    pub const fn address(&self) -> &AddressTemplate {
        &self.address
    }

    /// Description of this node
    pub const fn description(&self) -> &ResourceDescription {
        &self.description
    }

    /// Child nodes in discovery order
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Number of nodes in this subtree, this node included
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Nodes of this subtree in pre-order
    pub fn iter(&self) -> impl Iterator<Item = &Self> {
        let mut pending = vec![self];
        std::iter::from_fn(move || {
            let node = pending.pop()?;
            pending.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Find the node discovered at `address`
    pub fn find(&self, address: &AddressTemplate) -> Option<&Self> {
        self.iter().find(|node| &node.address == address)
    }
}
