//! Address resolution for entity instances

use error_stack::Report;

use crate::address::ResourceAddress;
use crate::constants::MAX_HIERARCHY_DEPTH;
use crate::entity::{Entity, EntityType};
use crate::error::{Error, Result};

/// Find the resource-type tag of `entity_type`, nearest declaration first
pub fn resource_type_of(entity_type: &'static EntityType) -> Result<&'static str> {
    let mut visited = 0;
    for level in entity_type.hierarchy() {
        if let Some(tag) = level.resource_type {
            return Ok(tag);
        }
        visited += 1;
    }

    if visited > MAX_HIERARCHY_DEPTH {
        return Err(Report::new(Error::AddressResolution {
            subject: entity_type.name.to_string(),
            reason:  format!("ancestor chain is deeper than {MAX_HIERARCHY_DEPTH} levels"),
        }));
    }
    Err(Report::new(Error::untagged(entity_type.name)))
}

/// Append `(tag, key)` for `entity` to its parent's address
pub fn resolve_address(entity: &dyn Entity, parent: &ResourceAddress) -> Result<ResourceAddress> {
    let tag = resource_type_of(entity.entity_type())?;
    Ok(parent.append(tag, entity.key().map(str::to_string)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    static BASE: EntityType = EntityType {
        name:          "Base",
        resource_type: Some("custom-handler"),
        ancestor:      None,
        bindings:      &[],
        subresources:  None,
    };

    static DERIVED: EntityType = EntityType {
        name:          "Derived",
        resource_type: None,
        ancestor:      Some(base),
        bindings:      &[],
        subresources:  None,
    };

    static OVERRIDE: EntityType = EntityType {
        name:          "Override",
        resource_type: Some("periodic-rotating-file-handler"),
        ancestor:      Some(base),
        bindings:      &[],
        subresources:  None,
    };

    static CYCLE: EntityType = EntityType {
        name:          "Cycle",
        resource_type: None,
        ancestor:      Some(cycle),
        bindings:      &[],
        subresources:  None,
    };

    fn base() -> &'static EntityType {
        &BASE
    }

    fn cycle() -> &'static EntityType {
        &CYCLE
    }

    #[test]
    fn test_nearest_tag_wins() {
        assert_eq!(resource_type_of(&BASE).ok(), Some("custom-handler"));
        assert_eq!(resource_type_of(&DERIVED).ok(), Some("custom-handler"));
        assert_eq!(
            resource_type_of(&OVERRIDE).ok(),
            Some("periodic-rotating-file-handler")
        );
    }

    #[test]
    fn test_cyclic_chain_is_rejected() {
        let err = resource_type_of(&CYCLE).expect_err("cycle must fail");
        match err.current_context() {
            Error::AddressResolution { subject, reason } => {
                assert_eq!(subject, "Cycle");
                assert!(reason.contains("deeper"), "{reason}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
