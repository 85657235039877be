use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{ResourceAddress, StatementContext};
use crate::constants::{ADDRESS_SEPARATOR, SEGMENT_SEPARATOR, WILDCARD};
use crate::error::{Error, Result};

/// Name part of a template segment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SegmentName {
    /// A literal resource name
    Fixed(String),
    /// `*`, any instance of the resource type
    Wildcard,
    /// `{key}`, substituted from the statement context
    Variable(String),
}

impl SegmentName {
    /// Name for an instance listed in a model description: `*` or a literal
    pub fn instance(name: &str) -> Self {
        if name == WILDCARD {
            Self::Wildcard
        } else {
            Self::Fixed(name.to_string())
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        if raw == WILDCARD {
            return Some(Self::Wildcard);
        }
        match raw.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')) {
            Some("") => None,
            Some(key) => Some(Self::Variable(key.to_string())),
            None => Some(Self::Fixed(raw.to_string())),
        }
    }
}

impl fmt::Display for SegmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(name) => f.write_str(name),
            Self::Wildcard => f.write_str(WILDCARD),
            Self::Variable(key) => write!(f, "{{{key}}}"),
        }
    }
}

/// One `(type, name)` step of a template
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateSegment {
    resource_type: String,
    name:          SegmentName,
}

impl TemplateSegment {
    /// Create a segment
    pub fn new(resource_type: impl Into<String>, name: SegmentName) -> Self {
        Self {
            resource_type: resource_type.into(),
            name,
        }
    }

    /// Resource type of the segment
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Name of the segment
    pub const fn name(&self) -> &SegmentName {
        &self.name
    }
}

impl fmt::Display for TemplateSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEGMENT_SEPARATOR}{}", self.resource_type, self.name)
    }
}

/// Immutable path template such as `/subsystem=logging/logging-profile=*`
///
/// The empty template (`/`) only shows up as the parent of a single-segment template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AddressTemplate {
    segments: Vec<TemplateSegment>,
}

impl AddressTemplate {
    /// The empty template
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Parse the text form
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let body = trimmed.strip_prefix(ADDRESS_SEPARATOR).unwrap_or(trimmed);
        if body.is_empty() {
            return Ok(Self::root());
        }

        let segments = body
            .split(ADDRESS_SEPARATOR)
            .map(|token| {
                token
                    .split_once(SEGMENT_SEPARATOR)
                    .filter(|(resource_type, _)| !resource_type.is_empty())
                    .and_then(|(resource_type, name)| {
                        SegmentName::parse(name)
                            .map(|name| TemplateSegment::new(resource_type, name))
                    })
                    .ok_or_else(|| {
                        Report::new(Error::InvalidAddress(text.to_string()))
                            .attach(format!("Malformed segment '{token}', expected type=name"))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { segments })
    }

    /// Segments from the root down
    pub fn segments(&self) -> &[TemplateSegment] {
        &self.segments
    }

    /// Number of segments
    pub fn token_length(&self) -> usize {
        self.segments.len()
    }

    /// Whether this is the empty template
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The segments in `range`, clamped to the template's length
    #[must_use]
    pub fn sub_template(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.segments.len());
        let start = range.start.min(end);
        Self {
            segments: self.segments[start..end].to_vec(),
        }
    }

    /// The template without its last segment
    #[must_use]
    pub fn parent(&self) -> Self {
        self.sub_template(0..self.segments.len().saturating_sub(1))
    }

    /// Return a new template with one more segment
    #[must_use]
    pub fn append(&self, resource_type: impl Into<String>, name: SegmentName) -> Self {
        let mut segments = self.segments.clone();
        segments.push(TemplateSegment::new(resource_type, name));
        Self { segments }
    }

    /// Resource type of the last segment
    pub fn resource_type(&self) -> Option<&str> {
        self.segments.last().map(TemplateSegment::resource_type)
    }

    /// Name of the last segment in text form (`*` for wildcards)
    pub fn resource_name(&self) -> Option<String> {
        self.segments.last().map(|segment| segment.name.to_string())
    }

    /// Resolve every segment through `context`
    pub fn resolve(&self, context: &dyn StatementContext) -> Result<ResourceAddress> {
        self.segments
            .iter()
            .map(|segment| {
                let value = match &segment.name {
                    SegmentName::Fixed(name) => Some(name.clone()),
                    SegmentName::Wildcard => context.wildcard(&segment.resource_type),
                    SegmentName::Variable(key) => context.variable(key),
                };
                value
                    .map(|value| super::PathElement::new(segment.resource_type.clone(), Some(value)))
                    .ok_or_else(|| {
                        Report::new(Error::AddressResolution {
                            subject: self.to_string(),
                            reason:  format!("no substitution for segment '{segment}'"),
                        })
                    })
            })
            .collect()
    }
}

impl FromStr for AddressTemplate {
    type Err = Report<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for AddressTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "{ADDRESS_SEPARATOR}");
        }
        for segment in &self.segments {
            write!(f, "{ADDRESS_SEPARATOR}{segment}")?;
        }
        Ok(())
    }
}

impl Serialize for AddressTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AddressTemplate {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(|report| serde::de::Error::custom(report.current_context()))
    }
}
