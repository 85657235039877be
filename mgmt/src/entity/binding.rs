use std::any::Any;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Outcome of reading one attribute binding: `Ok(None)` means the attribute is unset
pub type BindingRead = Result<Option<Value>, BindingError>;

/// Failure while reading a binding from an entity instance
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// The accessor was handed an instance of another type
    #[error("expected an instance of {expected}")]
    TypeMismatch {
        /// Type the accessor was generated for
        expected: &'static str,
    },

    /// The value could not be converted to a protocol value
    #[error("value is not representable as a protocol value: {0}")]
    Serialization(String),
}

/// Maps one protocol-facing attribute name to an accessor on the entity type
pub struct AttributeBinding {
    /// Protocol-facing attribute name, e.g. `color-map`
    pub name:  &'static str,
    /// In-language field name, e.g. `color_map`
    pub field: &'static str,
    /// Reads the attribute from an instance of the declaring type
    pub read:  fn(&dyn Any) -> BindingRead,
}

impl fmt::Debug for AttributeBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeBinding")
            .field("name", &self.name)
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

/// Downcast helper used by generated accessors
pub fn downcast<'a, T: Any>(instance: &'a dyn Any, expected: &'static str) -> Result<&'a T, BindingError> {
    instance
        .downcast_ref::<T>()
        .ok_or(BindingError::TypeMismatch { expected })
}

/// Conversion from a bound field to an optional protocol value
///
/// Fields are `Option<T>`: `None` is "unset" and is omitted from the add operation, while
/// `Some(String::new())` is "set to empty" and is sent.
pub trait AttributeValue {
    /// Convert the field's current value
    fn to_model_value(&self) -> BindingRead;
}

impl<T: Serialize> AttributeValue for Option<T> {
    fn to_model_value(&self) -> BindingRead {
        let Some(value) = self else {
            return Ok(None);
        };
        match serde_json::to_value(value) {
            Ok(Value::Null) => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(e) => Err(BindingError::Serialization(e.to_string())),
        }
    }
}

/// Conversion from a `#[key]` field to an instance name
pub trait AsKey {
    /// The key, if set
    fn as_key(&self) -> Option<&str>;
}

impl AsKey for String {
    fn as_key(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl AsKey for Option<String> {
    fn as_key(&self) -> Option<&str> {
        self.as_deref()
    }
}

impl AsKey for &'static str {
    fn as_key(&self) -> Option<&str> {
        Some(*self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_unset_and_empty_are_distinct() {
        let unset: Option<String> = None;
        let empty = Some(String::new());

        assert_eq!(unset.to_model_value(), Ok(None));
        assert_eq!(empty.to_model_value(), Ok(Some(json!(""))));
    }

    #[test]
    fn test_collection_values() {
        let handlers = Some(vec!["CONSOLE".to_string(), "FILE".to_string()]);
        assert_eq!(handlers.to_model_value(), Ok(Some(json!(["CONSOLE", "FILE"]))));

        let level = Some(5_i64);
        assert_eq!(level.to_model_value(), Ok(Some(json!(5))));
    }

    #[test]
    fn test_downcast_mismatch() {
        let value: &dyn Any = &5_u8;
        let err = downcast::<String>(value, "String").err();
        assert_eq!(err, Some(BindingError::TypeMismatch { expected: "String" }));
    }
}
