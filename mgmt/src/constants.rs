//! Protocol vocabulary and connection defaults

// Operation node keys
/// Operation name key
pub const OP: &str = "operation";
/// Operation address key
pub const OP_ADDR: &str = "address";
/// Composite steps key
pub const STEPS: &str = "steps";
/// Response outcome key
pub const OUTCOME: &str = "outcome";
/// Response result key
pub const RESULT: &str = "result";
/// Failure description key
pub const FAILURE_DESCRIPTION: &str = "failure-description";
/// Outcome value for a successful operation
pub const SUCCESS: &str = "success";

// Operation names
/// Composite operation
pub const COMPOSITE: &str = "composite";
/// Read the child types of a resource
pub const READ_CHILDREN_TYPES_OPERATION: &str = "read-children-types";
/// Read the description of a resource
pub const READ_RESOURCE_DESCRIPTION_OPERATION: &str = "read-resource-description";
/// Parameter asking `read-children-types` to list singletons as `type=name`
pub const INCLUDE_SINGLETONS: &str = "include-singletons";

// Description keys
/// Human readable description
pub const DESCRIPTION: &str = "description";
/// Attribute descriptions
pub const ATTRIBUTES: &str = "attributes";
/// Child type descriptions
pub const CHILDREN: &str = "children";
/// Per-instance description of a child type
pub const MODEL_DESCRIPTION: &str = "model-description";
/// Attribute type
pub const TYPE: &str = "type";
/// Element type of a list or object attribute
pub const VALUE_TYPE: &str = "value-type";
/// Whether an attribute may be undefined
pub const NILLABLE: &str = "nillable";
/// Whether an attribute accepts expressions
pub const EXPRESSIONS_ALLOWED: &str = "expressions-allowed";
/// Attribute access type
pub const ACCESS_TYPE: &str = "access-type";
/// Attribute default value
pub const DEFAULT: &str = "default";
/// Allowed attribute values
pub const ALLOWED: &str = "allowed";
/// Deprecation marker
pub const DEPRECATED: &str = "deprecated";
/// Key under which the JSON encoding stores a model type name
pub const TYPE_MODEL_VALUE: &str = "TYPE_MODEL_VALUE";

// Composite step result keys are `step-1`, `step-2`, ...
/// Prefix of composite step result keys
pub const STEP_PREFIX: &str = "step-";

// Addresses
/// Wildcard resource name
pub const WILDCARD: &str = "*";
/// Address template separator
pub const ADDRESS_SEPARATOR: char = '/';
/// Separator between resource type and name
pub const SEGMENT_SEPARATOR: char = '=';

// Connection defaults
/// Default management host
pub const DEFAULT_HOST: &str = "localhost";
/// Default HTTP management port
pub const DEFAULT_MANAGEMENT_PORT: u16 = 9990;
/// HTTP management endpoint path
pub const MANAGEMENT_PATH: &str = "/management";
/// HTTP protocol
pub const MANAGEMENT_HTTP_PROTOCOL: &str = "http";

/// Ancestor chains longer than this are treated as cyclic
pub const MAX_HIERARCHY_DEPTH: usize = 64;
