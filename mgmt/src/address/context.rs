use std::collections::HashMap;

/// Supplies the substitutions needed to resolve an [`AddressTemplate`](super::AddressTemplate)
pub trait StatementContext: Send + Sync {
    /// Name to use for a wildcard segment of the given resource type
    fn wildcard(&self, resource_type: &str) -> Option<String>;

    /// Value of a `{key}` variable segment
    fn variable(&self, key: &str) -> Option<String>;
}

/// Statement context that keeps wildcards as `*` unless told otherwise
///
/// Variables and wildcard overrides are registered up front; lookups never fail for
/// wildcards, so templates only fail to resolve on unknown variables.
#[derive(Debug, Clone, Default)]
pub struct DefaultStatementContext {
    wildcards: HashMap<String, String>,
    variables: HashMap<String, String>,
}

impl DefaultStatementContext {
    /// Create a context with no overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a value for a `{key}` variable
    #[must_use]
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Replace wildcards of `resource_type` with a fixed name
    #[must_use]
    pub fn with_wildcard(mut self, resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        self.wildcards.insert(resource_type.into(), name.into());
        self
    }
}

impl StatementContext for DefaultStatementContext {
    fn wildcard(&self, resource_type: &str) -> Option<String> {
        Some(
            self.wildcards
                .get(resource_type)
                .cloned()
                .unwrap_or_else(|| crate::constants::WILDCARD.to_string()),
        )
    }

    fn variable(&self, key: &str) -> Option<String> {
        self.variables.get(key).cloned()
    }
}
