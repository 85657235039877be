//! Management protocol client
//!
//! [`ManagementClient`] is the single I/O seam of the workspace: it sends one operation
//! node and returns the raw response node. [`HttpManagementClient`] talks to a live
//! server; [`InMemoryManagementClient`] answers from a captured model.

mod http_client;
mod in_memory;
mod request_builder;
mod response;

use async_trait::async_trait;
use serde_json::Value;

pub use http_client::{ClientConfig, HttpManagementClient};
pub use in_memory::InMemoryManagementClient;
pub use request_builder::OperationBuilder;
pub use response::{into_result, step_result};

use crate::error::Result;

/// Executes operation nodes against a management server
#[async_trait]
pub trait ManagementClient: Send + Sync {
    /// Execute `operation` and return the response node (`outcome`, `result`, ...)
    async fn execute(&self, operation: Value) -> Result<Value>;
}

#[async_trait]
impl<C: ManagementClient + ?Sized> ManagementClient for &C {
    async fn execute(&self, operation: Value) -> Result<Value> {
        (**self).execute(operation).await
    }
}

#[async_trait]
impl<C: ManagementClient + ?Sized> ManagementClient for std::sync::Arc<C> {
    async fn execute(&self, operation: Value) -> Result<Value> {
        (**self).execute(operation).await
    }
}
