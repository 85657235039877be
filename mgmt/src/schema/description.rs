//! Parsed `read-resource-description` results

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

use crate::constants::{
    ACCESS_TYPE, ALLOWED, ATTRIBUTES, CHILDREN, DEFAULT, DEPRECATED, DESCRIPTION,
    EXPRESSIONS_ALLOWED, MODEL_DESCRIPTION, NILLABLE, TYPE, TYPE_MODEL_VALUE, VALUE_TYPE,
    WILDCARD,
};

/// Value type of a management attribute
///
/// Matches the type names the server reports. Unknown names fall back to `Undefined`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelType {
    /// Arbitrary precision decimal
    BigDecimal,
    /// Arbitrary precision integer
    BigInteger,
    /// Boolean
    Boolean,
    /// Byte array
    Bytes,
    /// 64 bit float
    Double,
    /// Unresolved `${...}` expression
    Expression,
    /// 32 bit integer
    Int,
    /// Ordered list
    List,
    /// 64 bit integer
    Long,
    /// String-keyed map
    Object,
    /// Single key/value pair
    Property,
    /// Character string
    String,
    /// A type name
    Type,
    /// No value
    Undefined,
}

impl ModelType {
    /// Read a type from its JSON encoding: either `"STRING"` or
    /// `{"TYPE_MODEL_VALUE": "STRING"}`
    pub fn from_model(node: &Value) -> Option<Self> {
        type_name(node).and_then(|name| name.parse().ok())
    }
}

fn type_name(node: &Value) -> Option<&str> {
    node.as_str()
        .or_else(|| node.get(TYPE_MODEL_VALUE).and_then(Value::as_str))
}

/// Metadata of one attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeMeta {
    /// Attribute name, e.g. `color-map`
    pub name:                String,
    /// Value type
    #[serde(rename = "type")]
    pub model_type:          ModelType,
    /// Element type of lists and maps; a nested attribute table for complex objects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type:          Option<Value>,
    /// Human readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description:         Option<String>,
    /// Whether the attribute may be left undefined
    pub nillable:            bool,
    /// Whether `${...}` expressions are accepted
    pub expressions_allowed: bool,
    /// `read-only`, `read-write` or `metric`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_type:         Option<String>,
    /// Default value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default:             Option<Value>,
    /// Allowed values, empty when unrestricted
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed:             Vec<Value>,
    /// Whether the attribute is deprecated
    pub deprecated:          bool,
}

impl AttributeMeta {
    /// Parse one entry of a description's `attributes` object
    pub fn from_model(name: &str, node: &Value) -> Self {
        let value_type = node.get(VALUE_TYPE).map(|value_type| {
            type_name(value_type).map_or_else(|| value_type.clone(), Value::from)
        });

        Self {
            name: name.to_string(),
            model_type: node
                .get(TYPE)
                .and_then(ModelType::from_model)
                .unwrap_or(ModelType::Undefined),
            value_type,
            description: string_field(node, DESCRIPTION),
            nillable: bool_field(node, NILLABLE),
            expressions_allowed: bool_field(node, EXPRESSIONS_ALLOWED),
            access_type: string_field(node, ACCESS_TYPE),
            default: node.get(DEFAULT).filter(|value| !value.is_null()).cloned(),
            allowed: node
                .get(ALLOWED)
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            deprecated: node.get(DEPRECATED).is_some_and(|value| !value.is_null()),
        }
    }
}

/// A child type declared by a description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildType {
    /// Resource type of the child, e.g. `console-handler`
    pub name:           String,
    /// Human readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description:    Option<String>,
    /// Instance names under `model-description`, in server order
    pub instance_names: Vec<String>,
}

impl ChildType {
    fn from_model(name: &str, node: &Value) -> Self {
        Self {
            name:           name.to_string(),
            description:    string_field(node, DESCRIPTION),
            instance_names: node
                .get(MODEL_DESCRIPTION)
                .and_then(Value::as_object)
                .map(|instances| instances.keys().cloned().collect())
                .unwrap_or_default(),
        }
    }

    /// Instance names to descend into: the declared ones, or `*` when none are declared
    pub fn names_to_visit(&self) -> Vec<&str> {
        if self.instance_names.is_empty() {
            vec![WILDCARD]
        } else {
            self.instance_names.iter().map(String::as_str).collect()
        }
    }
}

/// Attribute and child-type metadata of one resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceDescription {
    type_tag:       String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description:    Option<String>,
    attributes:     Vec<AttributeMeta>,
    children:       Vec<ChildType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    singleton_name: Option<String>,
}

impl ResourceDescription {
    /// Parse a description node; `None` when `node` is not an object
    pub fn from_model(type_tag: &str, node: &Value) -> Option<Self> {
        let node = node.as_object()?;

        let attributes = node
            .get(ATTRIBUTES)
            .and_then(Value::as_object)
            .map(|attributes| {
                attributes
                    .iter()
                    .map(|(name, meta)| AttributeMeta::from_model(name, meta))
                    .collect()
            })
            .unwrap_or_default();

        let children = node
            .get(CHILDREN)
            .and_then(Value::as_object)
            .map(|children| {
                children
                    .iter()
                    .map(|(name, child)| ChildType::from_model(name, child))
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            type_tag: type_tag.to_string(),
            description: node
                .get(DESCRIPTION)
                .and_then(Value::as_str)
                .map(str::to_string),
            attributes,
            children,
            singleton_name: None,
        })
    }

    /// Resource type this description belongs to
    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    /// Human readable description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Attributes in server order
    pub fn attributes(&self) -> &[AttributeMeta] {
        &self.attributes
    }

    /// Look up one attribute
    pub fn attribute(&self, name: &str) -> Option<&AttributeMeta> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }

    /// Declared child types in server order
    pub fn children(&self) -> &[ChildType] {
        &self.children
    }

    /// Names of the declared child types
    pub fn child_names(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|child| child.name.as_str())
    }

    /// Whether the resource is the only instance of its type under its parent
    pub const fn is_singleton(&self) -> bool {
        self.singleton_name.is_some()
    }

    /// The fixed instance name of a singleton
    pub fn singleton_name(&self) -> Option<&str> {
        self.singleton_name.as_deref()
    }

    pub(crate) fn mark_singleton(&mut self, name: impl Into<String>) {
        self.singleton_name = Some(name.into());
    }
}

fn string_field(node: &Value, key: &str) -> Option<String> {
    node.get(key).and_then(Value::as_str).map(str::to_string)
}

fn bool_field(node: &Value, key: &str) -> bool {
    node.get(key).and_then(Value::as_bool).unwrap_or(false)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;

    fn handler_description() -> Value {
        json!({
            "description": "Defines a handler which writes to the console.",
            "attributes": {
                "level": {
                    "type": {"TYPE_MODEL_VALUE": "STRING"},
                    "description": "The log level specifying which message levels will be logged.",
                    "expressions-allowed": true,
                    "nillable": true,
                    "default": "ALL",
                    "allowed": ["ALL", "DEBUG", "INFO"],
                    "access-type": "read-write"
                },
                "autoflush": {
                    "type": "BOOLEAN",
                    "nillable": true,
                    "deprecated": {"since": "1.2.0"}
                },
                "handlers": {
                    "type": {"TYPE_MODEL_VALUE": "LIST"},
                    "value-type": {"TYPE_MODEL_VALUE": "STRING"}
                }
            },
            "children": {
                "pattern-formatter": {
                    "description": "A pattern formatter",
                    "model-description": {"*": {}}
                },
                "filter": {
                    "description": "A filter"
                }
            }
        })
    }

    #[test]
    fn test_parse_attributes() {
        let description = ResourceDescription::from_model("console-handler", &handler_description())
            .unwrap_or_else(|| panic!("description should parse"));

        assert_eq!(description.type_tag(), "console-handler");
        assert_eq!(description.attributes().len(), 3);

        let level = description
            .attribute("level")
            .unwrap_or_else(|| panic!("level attribute"));
        assert_eq!(level.model_type, ModelType::String);
        assert!(level.nillable);
        assert!(level.expressions_allowed);
        assert_eq!(level.default, Some(json!("ALL")));
        assert_eq!(level.allowed.len(), 3);
        assert_eq!(level.access_type.as_deref(), Some("read-write"));

        let autoflush = description.attribute("autoflush");
        assert_eq!(autoflush.map(|a| a.model_type), Some(ModelType::Boolean));
        assert_eq!(autoflush.map(|a| a.deprecated), Some(true));

        let handlers = description.attribute("handlers");
        assert_eq!(handlers.and_then(|a| a.value_type.clone()), Some(json!("STRING")));
    }

    #[test]
    fn test_children_keep_server_order() {
        let description = ResourceDescription::from_model("console-handler", &handler_description())
            .unwrap_or_else(|| panic!("description should parse"));

        let names: Vec<_> = description.child_names().collect();
        assert_eq!(names, ["pattern-formatter", "filter"]);
        assert_eq!(description.children()[0].names_to_visit(), ["*"]);
        assert_eq!(description.children()[1].names_to_visit(), ["*"]);
    }

    #[test]
    fn test_named_instances_are_visited() {
        let node = json!({
            "children": {"logging-profile": {"model-description": {"LP1": {}, "LP2": {}}}}
        });
        let description = ResourceDescription::from_model("subsystem", &node)
            .unwrap_or_else(|| panic!("description should parse"));

        assert_eq!(description.children()[0].names_to_visit(), ["LP1", "LP2"]);
    }

    #[test]
    fn test_singleton_stamp() {
        let mut description = ResourceDescription::from_model("subsystem", &json!({}))
            .unwrap_or_else(|| panic!("description should parse"));
        assert!(!description.is_singleton());
        assert_eq!(description.singleton_name(), None);

        description.mark_singleton("logging");
        assert!(description.is_singleton());
        assert_eq!(description.singleton_name(), Some("logging"));
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(ResourceDescription::from_model("subsystem", &Value::Null).is_none());
        assert!(ResourceDescription::from_model("subsystem", &json!([1])).is_none());
    }

    #[test]
    fn test_unknown_type_is_undefined() {
        let meta = AttributeMeta::from_model("x", &json!({"type": "VECTOR"}));
        assert_eq!(meta.model_type, ModelType::Undefined);
        assert!(!meta.nillable);
    }
}
