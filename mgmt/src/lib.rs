//! # Management model introspection and marshalling
//!
//! Client-side tooling for servers that expose a tree of named management resources
//! over a request/response protocol.
//!
//! - [`schema`] discovers the shape of a remote subtree with one batched request per
//!   node and returns a [`ResourceMetaData`] tree.
//! - [`marshal`] turns a typed entity graph into the ordered `add` operations that
//!   recreate it on the server.
//!
//! ```ignore
//! use mgmt_model::{Entity, Marshaller, Subresources};
//!
//! #[derive(Entity)]
//! #[entity(resource_type = "pattern-formatter")]
//! struct PatternFormatter {
//!     #[key]
//!     name:    String,
//!     #[attribute]
//!     pattern: Option<String>,
//! }
//!
//! let formatter = PatternFormatter { name: "PATTERN".into(), pattern: Some("%d %p".into()) };
//! let operations = Marshaller::default().marshal(&formatter)?;
//! ```

extern crate self as mgmt_model;

pub mod address;
pub mod client;
pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod logging;
pub mod marshal;
pub mod runner;
pub mod schema;

pub use address::{AddressTemplate, DefaultStatementContext, ResourceAddress, StatementContext};
pub use client::{ClientConfig, HttpManagementClient, InMemoryManagementClient, ManagementClient};
pub use config::{Config, GeneratorTarget};
pub use entity::{Entity, EntityType, SubresourceHolder};
pub use error::{Error, Result};
pub use marshal::{EntityRegistry, Marshaller, Operation};
pub use mgmt_model_macros::{Entity, Subresources};
pub use schema::{ResourceDescription, ResourceMetaData, SchemaIntrospector};
