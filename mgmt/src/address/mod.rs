//! Resource addresses
//!
//! An [`AddressTemplate`] names a position in the remote resource tree and may contain
//! wildcard or variable segments. Resolving it through a [`StatementContext`] yields a
//! concrete [`ResourceAddress`], which is what operations are sent to.

mod context;
mod resolved;
mod template;

pub use context::{DefaultStatementContext, StatementContext};
pub use resolved::{PathElement, ResourceAddress};
pub use template::{AddressTemplate, SegmentName, TemplateSegment};
