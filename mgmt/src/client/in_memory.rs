//! Management client answering from an in-memory model
//!
//! Holds child-type listings and resource descriptions keyed by address text
//! (`/subsystem=logging`). Supports `read-children-types`, `read-resource-description`
//! and `composite`, which is enough to run the schema introspector offline against a
//! captured model.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use error_stack::Report;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::ManagementClient;
use crate::address::{PathElement, ResourceAddress};
use crate::constants::{
    COMPOSITE, FAILURE_DESCRIPTION, OP, OP_ADDR, OUTCOME, READ_CHILDREN_TYPES_OPERATION,
    READ_RESOURCE_DESCRIPTION_OPERATION, RESULT, STEP_PREFIX, STEPS, SUCCESS,
};
use crate::error::{Error, Result};

/// In-memory management model
#[derive(Debug, Default)]
pub struct InMemoryManagementClient {
    children_types: HashMap<String, Vec<String>>,
    descriptions:   HashMap<String, Value>,
    failures:       HashMap<String, String>,
    requests:       AtomicUsize,
}

impl InMemoryManagementClient {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the `read-children-types` answer for `address`
    #[must_use]
    pub fn with_children_types(mut self, address: &str, types: &[&str]) -> Self {
        self.children_types.insert(
            normalize(address),
            types.iter().map(|t| (*t).to_string()).collect(),
        );
        self
    }

    /// Register the `read-resource-description` answer for `address`
    #[must_use]
    pub fn with_description(mut self, address: &str, description: Value) -> Self {
        self.descriptions.insert(normalize(address), description);
        self
    }

    /// Make every operation on `address` fail with `message`
    #[must_use]
    pub fn with_failure(mut self, address: &str, message: &str) -> Self {
        self.failures.insert(normalize(address), message.to_string());
        self
    }

    /// Number of top-level requests executed so far
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    fn execute_step(&self, operation: &Value) -> Value {
        let name = operation.get(OP).and_then(Value::as_str).unwrap_or_default();
        let Some(address) = operation.get(OP_ADDR).and_then(address_text) else {
            return failed(format!("Malformed address in {operation}"));
        };

        if let Some(message) = self.failures.get(&address) {
            return failed(message.clone());
        }

        match name {
            READ_CHILDREN_TYPES_OPERATION => self.children_types.get(&address).map_or_else(
                || failed(format!("Management resource '{address}' not found")),
                |types| success(json!(types)),
            ),
            READ_RESOURCE_DESCRIPTION_OPERATION => self.descriptions.get(&address).map_or_else(
                || failed(format!("No resource definition is registered for address {address}")),
                |description| success(description.clone()),
            ),
            COMPOSITE => self.execute_composite(operation),
            other => failed(format!("Operation '{other}' not found")),
        }
    }

    fn execute_composite(&self, operation: &Value) -> Value {
        let steps = operation
            .get(STEPS)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut results = Map::new();
        let mut failure = None;
        for (index, step) in steps.iter().enumerate() {
            let response = self.execute_step(step);
            if failure.is_none() && response.get(OUTCOME) != Some(&json!(SUCCESS)) {
                failure = response.get(FAILURE_DESCRIPTION).cloned();
            }
            results.insert(format!("{STEP_PREFIX}{}", index + 1), response);
        }

        match failure {
            None => success(Value::Object(results)),
            Some(description) => json!({
                OUTCOME: "failed",
                FAILURE_DESCRIPTION: {"WFLYCTL0062: Composite operation failed": description},
                RESULT: results,
                "rolled-back": true
            }),
        }
    }
}

#[async_trait]
impl ManagementClient for InMemoryManagementClient {
    async fn execute(&self, operation: Value) -> Result<Value> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        debug!("In-memory management request - {operation}");

        if !operation.is_object() {
            return Err(Report::new(Error::Transport(format!(
                "operation is not an object: {operation}"
            ))));
        }
        Ok(self.execute_step(&operation))
    }
}

fn success(result: Value) -> Value {
    json!({ OUTCOME: SUCCESS, RESULT: result })
}

fn failed(description: String) -> Value {
    json!({ OUTCOME: "failed", FAILURE_DESCRIPTION: description })
}

fn normalize(address: &str) -> String {
    let trimmed = address.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Address text of a protocol address list
fn address_text(node: &Value) -> Option<String> {
    node.as_array()?
        .iter()
        .map(|entry| {
            let (key, value) = entry.as_object()?.iter().next()?;
            Some(PathElement::new(key.clone(), Some(value.as_str()?.to_string())))
        })
        .collect::<Option<ResourceAddress>>()
        .map(|address| address.to_string())
}
