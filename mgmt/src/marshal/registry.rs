//! Adapter and subresource-accessor caches
//!
//! One [`EntityRegistry`] is constructed at startup and shared (`Arc`) with every
//! marshaller. Entries are filled lazily, installed at most once per type, and never
//! evicted.

use std::any::{Any, TypeId};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use super::adapter::EntityAdapter;
use crate::entity::{Entity, EntityType, SubresourceAccessor};
use crate::error::Result;

/// Where an entity's subresource holder lives and what it exposes
#[derive(Debug, Clone, Copy)]
pub struct SubresourceLookup {
    /// `ancestor()` steps from the instance to the level that declares the holder
    pub depth:     usize,
    /// Accessors in declaration order
    pub accessors: &'static [SubresourceAccessor],
}

/// Thread-safe lazy caches keyed by entity type
#[derive(Debug, Default)]
pub struct EntityRegistry {
    adapters:     DashMap<TypeId, Arc<EntityAdapter>>,
    subresources: DashMap<TypeId, Option<SubresourceLookup>>,
}

impl EntityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapter for the runtime type of `entity`
    pub fn adapter_for(&self, entity: &dyn Entity) -> Result<Arc<EntityAdapter>> {
        self.adapter_for_type(Any::type_id(entity.as_any()), entity.entity_type())
    }

    /// Adapter for the static type `T`
    pub fn adapter<T: Entity>(&self) -> Result<Arc<EntityAdapter>> {
        self.adapter_for_type(TypeId::of::<T>(), T::descriptor())
    }

    fn adapter_for_type(
        &self,
        type_id: TypeId,
        entity_type: &'static EntityType,
    ) -> Result<Arc<EntityAdapter>> {
        let cached = self.adapters.get(&type_id).map(|entry| Arc::clone(entry.value()));
        if let Some(adapter) = cached {
            return Ok(adapter);
        }

        // Racing builders may both get here; only the first insert is kept.
        let built = Arc::new(EntityAdapter::build(entity_type)?);
        let installed = Arc::clone(self.adapters.entry(type_id).or_insert(built).value());
        debug!("Installed attribute adapter for {}", entity_type.name);
        Ok(installed)
    }

    /// Subresource holder lookup for the runtime type of `entity`
    ///
    /// The nearest level of the type hierarchy that declares a holder wins. A type with no
    /// holder anywhere is cached as `None`.
    pub fn subresources_for(&self, entity: &dyn Entity) -> Option<SubresourceLookup> {
        let type_id = Any::type_id(entity.as_any());
        if let Some(cached) = self.subresources.get(&type_id).map(|entry| *entry.value()) {
            return cached;
        }

        let entity_type = entity.entity_type();
        let lookup = entity_type
            .hierarchy()
            .enumerate()
            .find_map(|(depth, level)| {
                level.subresources.map(|accessors| SubresourceLookup {
                    depth,
                    accessors: accessors(),
                })
            });

        let installed = *self.subresources.entry(type_id).or_insert(lookup).value();
        debug!(
            "Cached subresource lookup for {}: {}",
            entity_type.name,
            installed.map_or(0, |lookup| lookup.accessors.len())
        );
        installed
    }

    /// Number of cached adapters
    pub fn adapter_count(&self) -> usize {
        self.adapters.len()
    }

    /// Number of cached subresource lookups, negative results included
    pub fn subresource_lookup_count(&self) -> usize {
        self.subresources.len()
    }
}
