use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::constants::{ADDRESS_SEPARATOR, SEGMENT_SEPARATOR, WILDCARD};

/// One `(type, name)` step of a resolved address
///
/// The name is absent for keyless entities; the protocol form writes it as `*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathElement {
    key:   String,
    value: Option<String>,
}

impl PathElement {
    /// Create a path element
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Resource type of this element
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Resource name of this element, if any
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    fn value_or_wildcard(&self) -> &str {
        self.value.as_deref().unwrap_or(WILDCARD)
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEGMENT_SEPARATOR}{}", self.key, self.value_or_wildcard())
    }
}

/// A concrete address in the remote resource tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ResourceAddress(Vec<PathElement>);

impl ResourceAddress {
    /// The root address
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Return a new address with one more element
    #[must_use]
    pub fn append(&self, key: impl Into<String>, value: Option<String>) -> Self {
        let mut elements = self.0.clone();
        elements.push(PathElement::new(key, value));
        Self(elements)
    }

    /// Elements from the root down
    pub fn elements(&self) -> &[PathElement] {
        &self.0
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root address
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The last element, if any
    pub fn last(&self) -> Option<&PathElement> {
        self.0.last()
    }

    /// Protocol form: a list of single-entry objects
    pub fn to_model_node(&self) -> Value {
        Value::Array(
            self.0
                .iter()
                .map(|element| {
                    let mut entry = Map::new();
                    entry.insert(
                        element.key.clone(),
                        Value::String(element.value_or_wildcard().to_string()),
                    );
                    Value::Object(entry)
                })
                .collect(),
        )
    }
}

impl FromIterator<PathElement> for ResourceAddress {
    fn from_iter<I: IntoIterator<Item = PathElement>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "{ADDRESS_SEPARATOR}");
        }
        for element in &self.0 {
            write!(f, "{ADDRESS_SEPARATOR}{element}")?;
        }
        Ok(())
    }
}

impl Serialize for ResourceAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_model_node().serialize(serializer)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_model_node_form() {
        let address = ResourceAddress::empty()
            .append("subsystem", Some("logging".to_string()))
            .append("console-handler", None);

        assert_eq!(
            address.to_model_node(),
            json!([{"subsystem": "logging"}, {"console-handler": "*"}])
        );
        assert_eq!(address.to_string(), "/subsystem=logging/console-handler=*");
    }

    #[test]
    fn test_empty_address() {
        let address = ResourceAddress::empty();
        assert!(address.is_empty());
        assert_eq!(address.to_model_node(), json!([]));
        assert_eq!(address.to_string(), "/");
    }

    #[test]
    fn test_append_leaves_original_untouched() {
        let parent = ResourceAddress::empty().append("subsystem", Some("logging".to_string()));
        let child = parent.append("pattern-formatter", Some("PATTERN".to_string()));

        assert_eq!(parent.len(), 1);
        assert_eq!(child.len(), 2);
        assert_eq!(child.last().map(PathElement::key), Some("pattern-formatter"));
        assert_eq!(child.last().and_then(PathElement::value), Some("PATTERN"));
    }
}
