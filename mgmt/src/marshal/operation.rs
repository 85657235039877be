//! Add operations produced by the marshaller

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display};

use crate::address::ResourceAddress;
use crate::client::OperationBuilder;
use crate::constants::COMPOSITE;

/// Operation verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Verb {
    /// Create the resource with the given attributes
    Add,
}

/// One instruction targeting a resolved address
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    address:    ResourceAddress,
    verb:       Verb,
    attributes: Map<String, Value>,
}

impl Operation {
    /// Create an add operation
    pub const fn add(address: ResourceAddress, attributes: Map<String, Value>) -> Self {
        Self {
            address,
            verb: Verb::Add,
            attributes,
        }
    }

    /// Target address
    pub const fn address(&self) -> &ResourceAddress {
        &self.address
    }

    /// Operation verb
    pub const fn verb(&self) -> Verb {
        self.verb
    }

    /// Attribute values, present attributes only
    pub const fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Protocol form: `{"operation":"add","address":[...],<attributes>}`
    pub fn to_model_node(&self) -> Value {
        OperationBuilder::new(self.verb.as_ref())
            .address(self.address.to_model_node())
            .params(self.attributes.clone())
            .build()
    }

    /// Wrap `operations` into one composite request, applied atomically by the server
    pub fn composite(operations: &[Self]) -> Value {
        OperationBuilder::new(COMPOSITE)
            .address(Value::Array(Vec::new()))
            .steps(operations.iter().map(Self::to_model_node).collect())
            .build()
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_model_node().serialize(serializer)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;

    fn formatter_add() -> Operation {
        let address = ResourceAddress::empty()
            .append("subsystem", Some("logging".to_string()))
            .append("pattern-formatter", Some("PATTERN".to_string()));
        let mut attributes = Map::new();
        attributes.insert("pattern".to_string(), json!("%d %p"));
        Operation::add(address, attributes)
    }

    #[test]
    fn test_model_node() {
        assert_eq!(
            formatter_add().to_model_node(),
            json!({
                "operation": "add",
                "address": [{"subsystem": "logging"}, {"pattern-formatter": "PATTERN"}],
                "pattern": "%d %p"
            })
        );
        assert_eq!(Verb::Add.to_string(), "add");
    }

    #[test]
    fn test_composite_keeps_order() {
        let first = formatter_add();
        let second = Operation::add(ResourceAddress::empty(), Map::new());

        let composite = Operation::composite(&[first.clone(), second.clone()]);
        assert_eq!(composite["operation"], json!("composite"));
        assert_eq!(composite["address"], json!([]));
        assert_eq!(
            composite["steps"],
            json!([first.to_model_node(), second.to_model_node()])
        );
    }
}
