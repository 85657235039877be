//! Error types and the crate Result alias

use thiserror::Error;

// Error message prefixes
const MSG_FAILED_TO_PREFIX: &str = "Failed to";
const MSG_INVALID_PREFIX: &str = "Invalid";
const MSG_MISSING_PREFIX: &str = "Missing";

/// Result type for the `mgmt_model` library
pub type Result<T> = core::result::Result<T, error_stack::Report<Error>>;

/// Error categories reported by the introspector, the marshaller and their collaborators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An entity binding could not be read while building its attribute map
    #[error("Adapter build failed for {type_name}: {reason}")]
    AdapterBuild {
        /// Entity type whose adapter failed
        type_name: &'static str,
        /// What went wrong
        reason:    String,
    },

    /// No resource-type tag could be found for an entity, or a template could not be resolved
    #[error("Address resolution failed for {subject}: {reason}")]
    AddressResolution {
        /// Entity type or address template being resolved
        subject: String,
        /// What went wrong
        reason:  String,
    },

    /// The configuration file is missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Output could not be written
    #[error("File operation failed: {0}")]
    FileOperation(String),

    /// Address template text that does not parse
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// A declared child type has no usable description in the response
    #[error("Schema inconsistency at {address}: {reason}")]
    SchemaInconsistency {
        /// Address template of the node being described
        address: String,
        /// What was missing
        reason:  String,
    },

    /// The request failed or returned malformed results
    #[error("Transport error: {0}")]
    Transport(String),
}

impl Error {
    /// Create an `AddressResolution` error for an entity type with no resource-type tag
    pub fn untagged(type_name: &str) -> Self {
        Self::AddressResolution {
            subject: type_name.to_string(),
            reason:  "no resource type declared on the type or any of its ancestors".to_string(),
        }
    }

    /// Create an `AdapterBuild` error
    pub fn adapter(type_name: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::AdapterBuild {
            type_name,
            reason: reason.to_string(),
        }
    }

    /// Create a `SchemaInconsistency` error
    pub fn inconsistent(address: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        Self::SchemaInconsistency {
            address: address.to_string(),
            reason:  reason.to_string(),
        }
    }

    /// Create a "Failed to X" transport error
    pub fn transport_failed(action: &str, details: impl std::fmt::Display) -> Self {
        Self::Transport(format!("{MSG_FAILED_TO_PREFIX} {action}: {details}"))
    }

    /// Create a transport error for a response missing a field
    pub fn missing(what: &str) -> Self {
        Self::Transport(format!("{MSG_MISSING_PREFIX} {what} in response"))
    }

    /// Create an "Invalid X" configuration error
    pub fn invalid_config(what: &str, details: impl std::fmt::Display) -> Self {
        Self::Configuration(format!("{MSG_INVALID_PREFIX} {what}: {details}"))
    }

    /// Create error for IO operations
    pub fn io_failed(
        operation: &str,
        path: &std::path::Path,
        error: impl std::fmt::Display,
    ) -> Self {
        Self::FileOperation(format!(
            "{MSG_FAILED_TO_PREFIX} {operation} {}: {error}",
            path.display()
        ))
    }
}
