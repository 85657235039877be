//! Per-type attribute adapter

use std::collections::HashSet;

use error_stack::Report;
use serde_json::{Map, Value};

use crate::constants::MAX_HIERARCHY_DEPTH;
use crate::entity::{AttributeBinding, Entity, EntityType, ancestor_at};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
struct ResolvedBinding {
    /// How many `ancestor()` steps lead from the instance to the declaring level
    depth:   usize,
    binding: &'static AttributeBinding,
}

/// Reads an entity's attribute bindings into an add-operation attribute map
///
/// Built once per entity type from the type's metadata table and the tables of its
/// ancestors. When two levels bind the same protocol name the nearest one wins.
#[derive(Debug)]
pub struct EntityAdapter {
    type_name: &'static str,
    bindings:  Vec<ResolvedBinding>,
}

impl EntityAdapter {
    /// Flatten the bindings of `entity_type` and its ancestors
    pub fn build(entity_type: &'static EntityType) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut bindings = Vec::new();

        for (depth, level) in entity_type.hierarchy().enumerate() {
            if depth == MAX_HIERARCHY_DEPTH {
                return Err(Report::new(Error::adapter(
                    entity_type.name,
                    format!("ancestor chain is deeper than {MAX_HIERARCHY_DEPTH} levels"),
                )));
            }
            for binding in level.bindings {
                if seen.insert(binding.name) {
                    bindings.push(ResolvedBinding { depth, binding });
                }
            }
        }

        Ok(Self {
            type_name: entity_type.name,
            bindings,
        })
    }

    /// Name of the entity type this adapter was built for
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the type (or an ancestor) declares any attribute binding
    pub fn declares_attributes(&self) -> bool {
        !self.bindings.is_empty()
    }

    /// Protocol names of all bindings, nearest level first
    pub fn attribute_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.bindings.iter().map(|resolved| resolved.binding.name)
    }

    /// Build the attribute map for `entity`
    ///
    /// Returns `Ok(None)` when the type declares no bindings at all: such a node is pure
    /// grouping and gets no operation of its own. Unset attributes are left out of the map.
    pub fn from_entity(&self, entity: &dyn Entity) -> Result<Option<Map<String, Value>>> {
        if !self.declares_attributes() {
            return Ok(None);
        }

        let mut attributes = Map::new();
        for resolved in &self.bindings {
            let binding = resolved.binding;
            let level = ancestor_at(entity, resolved.depth).ok_or_else(|| {
                Report::new(Error::adapter(
                    self.type_name,
                    format!("instance exposes no ancestor {} levels up", resolved.depth),
                ))
                .attach(format!("Attribute: {}", binding.name))
            })?;

            match (binding.read)(level.as_any()) {
                Ok(Some(value)) => {
                    attributes.insert(binding.name.to_string(), value);
                }
                Ok(None) => {}
                Err(e) => {
                    return Err(Report::new(Error::adapter(self.type_name, e))
                        .attach(format!("Attribute: {} (field {})", binding.name, binding.field)));
                }
            }
        }

        Ok(Some(attributes))
    }
}
