//! Builder for protocol operation nodes

use serde_json::{Map, Value};

use crate::constants::{OP, OP_ADDR, STEPS};

/// Builds the JSON node for one operation
///
/// Keys keep insertion order: `operation`, `address`, then parameters.
#[derive(Debug, Clone)]
pub struct OperationBuilder {
    node: Map<String, Value>,
}

impl OperationBuilder {
    /// Start an operation with the given name
    pub fn new(operation: &str) -> Self {
        let mut node = Map::new();
        node.insert(OP.to_string(), Value::String(operation.to_string()));
        Self { node }
    }

    /// Set the target address (protocol list form)
    #[must_use]
    pub fn address(mut self, address: Value) -> Self {
        self.node.insert(OP_ADDR.to_string(), address);
        self
    }

    /// Add one parameter
    #[must_use]
    pub fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.node.insert(name.to_string(), value.into());
        self
    }

    /// Add every entry of `params`
    #[must_use]
    pub fn params(mut self, params: Map<String, Value>) -> Self {
        self.node.extend(params);
        self
    }

    /// Set composite steps
    #[must_use]
    pub fn steps(mut self, steps: Vec<Value>) -> Self {
        self.node.insert(STEPS.to_string(), Value::Array(steps));
        self
    }

    /// Finish the node
    pub fn build(self) -> Value {
        Value::Object(self.node)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_build_read_children_types() {
        let node = OperationBuilder::new("read-children-types")
            .address(json!([{"subsystem": "logging"}]))
            .param("include-singletons", true)
            .build();

        assert_eq!(
            serde_json::to_string(&node).unwrap_or_default(),
            r#"{"operation":"read-children-types","address":[{"subsystem":"logging"}],"include-singletons":true}"#
        );
    }
}
