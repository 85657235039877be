//! Recursive schema discovery
//!
//! Each node costs exactly one composite request: the parent's child-type listing (with
//! singletons spelled out as `type=name`) and the node's own description travel together.
//! A node is a singleton when its `type=name` appears verbatim in that listing.

use std::sync::Arc;

use error_stack::{Report, ResultExt};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::{Value, json};
use tracing::debug;

use super::{ResourceDescription, ResourceMetaData};
use crate::address::{
    AddressTemplate, DefaultStatementContext, ResourceAddress, SegmentName, StatementContext,
};
use crate::client::{ManagementClient, OperationBuilder, into_result, step_result};
use crate::constants::{
    COMPOSITE, INCLUDE_SINGLETONS, OUTCOME, READ_CHILDREN_TYPES_OPERATION,
    READ_RESOURCE_DESCRIPTION_OPERATION, RESULT, SUCCESS, WILDCARD,
};
use crate::error::{Error, Result};

/// Discovers the schema of a resource subtree
pub struct SchemaIntrospector<C> {
    client:  C,
    context: Arc<dyn StatementContext>,
}

impl<C: ManagementClient> SchemaIntrospector<C> {
    /// Create an introspector resolving wildcards to `*`
    pub fn new(client: C) -> Self {
        Self {
            client,
            context: Arc::new(DefaultStatementContext::new()),
        }
    }

    /// Use `context` to resolve template wildcards and variables
    #[must_use]
    pub fn with_context(mut self, context: impl StatementContext + 'static) -> Self {
        self.context = Arc::new(context);
        self
    }

    /// The underlying client
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Discover `target` and everything below it
    ///
    /// Any failed request aborts the whole target; no partial tree is returned.
    pub async fn discover(&self, target: &AddressTemplate) -> Result<ResourceMetaData> {
        if target.is_root() {
            return Err(Report::new(Error::InvalidAddress(target.to_string()))
                .attach("Discovery targets need at least one segment"));
        }
        let tree = self.discover_node(target.clone()).await?;
        debug!("Discovered {} nodes below {target}", tree.node_count());
        Ok(tree)
    }

    fn discover_node(&self, address: AddressTemplate) -> BoxFuture<'_, Result<ResourceMetaData>> {
        async move {
            let description = self.load_description(&address).await?;

            let mut children = Vec::new();
            for child in description.children() {
                for name in child.names_to_visit() {
                    let child_address = address.append(&child.name, SegmentName::instance(name));
                    children.push(self.discover_node(child_address).await?);
                }
            }

            Ok(ResourceMetaData::new(address, description, children))
        }
        .boxed()
    }

    /// Describe one node with a single composite request, stamping singletons
    pub async fn load_description(&self, address: &AddressTemplate) -> Result<ResourceDescription> {
        let Some(resource_type) = address.resource_type() else {
            return Err(Report::new(Error::InvalidAddress(address.to_string()))
                .attach("Cannot describe the root template"));
        };

        let parent = address.parent().resolve(self.context.as_ref())?;
        let target = address.resolve(self.context.as_ref())?;
        debug!("Describing {address} (resolved {target})");

        let response = self
            .client
            .execute(describe_operation(&parent, &target))
            .await
            .attach(format!("Address template: {address}"))?;
        let result = into_result(response, &format!("describe {target}"))?;

        let child_types = child_types(&result, &parent)?;
        let node = description_node(&result, &target)?;

        let mut description = ResourceDescription::from_model(resource_type, node).ok_or_else(|| {
            Report::new(Error::inconsistent(address, "description is not an object"))
        })?;

        if let Some(singleton) = singleton_name(&target, &child_types) {
            debug!("{address} is singleton {resource_type}={singleton}");
            description.mark_singleton(singleton);
        }
        Ok(description)
    }
}

fn describe_operation(parent: &ResourceAddress, target: &ResourceAddress) -> Value {
    OperationBuilder::new(COMPOSITE)
        .address(json!([]))
        .steps(vec![
            OperationBuilder::new(READ_CHILDREN_TYPES_OPERATION)
                .address(parent.to_model_node())
                .param(INCLUDE_SINGLETONS, true)
                .build(),
            OperationBuilder::new(READ_RESOURCE_DESCRIPTION_OPERATION)
                .address(target.to_model_node())
                .build(),
        ])
        .build()
}

/// Child-type listing of the parent, from step 1
fn child_types(result: &Value, parent: &ResourceAddress) -> Result<Vec<String>> {
    let step = step_result(result, 1)
        .cloned()
        .ok_or_else(|| Report::new(Error::missing("step-1")))?;
    let listing = into_result(step, &format!("read children types of {parent}"))?;

    listing
        .as_array()
        .and_then(|types| {
            types
                .iter()
                .map(|name| name.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
        .ok_or_else(|| {
            Report::new(Error::transport_failed(
                &format!("read children types of {parent}"),
                "result is not a list of strings",
            ))
            .attach(format!("Result: {listing}"))
        })
}

/// Description node from step 2
///
/// Wildcard addresses are answered with a list of per-match results; the first
/// successful entry is used.
fn description_node<'a>(result: &'a Value, target: &ResourceAddress) -> Result<&'a Value> {
    let step = step_result(result, 2).ok_or_else(|| Report::new(Error::missing("step-2")))?;
    if step.get(OUTCOME).and_then(Value::as_str) != Some(SUCCESS) {
        // Surfaces the step's failure description
        into_result(step.clone(), &format!("describe {target}"))?;
    }

    let node = match step.get(RESULT) {
        Some(Value::Array(entries)) => entries
            .iter()
            .find(|entry| entry.get(OUTCOME).and_then(Value::as_str) == Some(SUCCESS))
            .and_then(|entry| entry.get(RESULT)),
        Some(Value::Null) | None => None,
        Some(node) => Some(node),
    };

    node.ok_or_else(|| Report::new(Error::inconsistent(target, "no description in response")))
}

fn singleton_name(target: &ResourceAddress, child_types: &[String]) -> Option<String> {
    let last = target.last()?;
    let name = last.value().filter(|name| *name != WILDCARD)?;
    let entry = last.to_string();
    child_types
        .iter()
        .any(|listed| *listed == entry)
        .then(|| name.to_string())
}
