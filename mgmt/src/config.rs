//! Introspection run configuration
//!
//! ```json
//! {
//!   "host": "localhost",
//!   "port": 9990,
//!   "targets": [{ "name": "logging", "source_address": "/subsystem=logging" }]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::address::AddressTemplate;
use crate::client::ClientConfig;
use crate::error::{Error, Result};

/// One subtree to discover
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorTarget {
    /// Output name, also the file stem of the JSON dump
    pub name:           String,
    /// Root template of the subtree
    pub source_address: AddressTemplate,
}

/// Connection settings plus the list of targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// How to reach the server
    #[serde(flatten)]
    pub connection: ClientConfig,
    /// Targets, discovered in order
    pub targets:    Vec<GeneratorTarget>,
}

impl Config {
    /// Load and validate a configuration file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Report::new(Error::Configuration(format!(
                "Failed to read {}: {e}",
                path.display()
            )))
        })?;
        Self::from_json_str(&text).map_err(|report| report.attach(format!("File: {}", path.display())))
    }

    /// Parse and validate configuration text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| Report::new(Error::invalid_config("configuration JSON", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(Report::new(Error::invalid_config(
                "targets",
                "at least one target is required",
            )));
        }

        let mut names = HashSet::new();
        for target in &self.targets {
            if target.name.trim().is_empty() {
                return Err(Report::new(Error::invalid_config(
                    "target name",
                    "names must not be empty",
                )));
            }
            if target.name.contains(['/', '\\']) || target.name.contains("..") {
                return Err(Report::new(Error::invalid_config(
                    "target name",
                    format!("'{}' must be a plain file stem", target.name),
                )));
            }
            if !names.insert(target.name.as_str()) {
                return Err(Report::new(Error::invalid_config(
                    "target name",
                    format!("'{}' is used more than once", target.name),
                )));
            }
            if target.source_address.is_root() {
                return Err(Report::new(Error::invalid_config(
                    "source address",
                    format!("target '{}' needs at least one segment", target.name),
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::constants::DEFAULT_MANAGEMENT_PORT;

    fn config_error(text: &str) -> Option<Error> {
        Config::from_json_str(text)
            .err()
            .map(|report| report.current_context().clone())
    }

    #[test]
    fn test_defaults_apply() {
        let config = Config::from_json_str(
            r#"{"targets": [{"name": "logging", "source_address": "/subsystem=logging"}]}"#,
        )
        .expect("valid config");

        assert_eq!(config.connection.host, "localhost");
        assert_eq!(config.connection.port, DEFAULT_MANAGEMENT_PORT);
        assert_eq!(config.connection.username, None);
        assert_eq!(config.connection.timeout_secs, None);
        assert_eq!(config.targets[0].source_address.token_length(), 1);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{
                "host": "mgmt.example.com",
                "port": 19990,
                "username": "admin",
                "password": "secret",
                "timeout_secs": 30,
                "targets": [
                    {{"name": "logging", "source_address": "/subsystem=logging"}},
                    {{"name": "profiles", "source_address": "/subsystem=logging/logging-profile=*"}}
                ]
            }}"#
        )
        .unwrap();

        let config = Config::from_json_file(file.path()).expect("valid config");
        assert_eq!(config.connection.host, "mgmt.example.com");
        assert_eq!(config.connection.port, 19990);
        assert_eq!(config.connection.username.as_deref(), Some("admin"));
        assert_eq!(config.connection.timeout_secs, Some(30));
        assert_eq!(
            config.targets.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            ["logging", "profiles"]
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Config::from_json_file(&dir.path().join("absent.json")).err();
        assert!(matches!(
            err.as_ref().map(Report::current_context),
            Some(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_target_name_must_stay_in_output_directory() {
        for name in ["../x", "a/b", "..", "a\\b", "/abs"] {
            let text = format!(
                r#"{{"targets": [{{"name": {}, "source_address": "/subsystem=logging"}}]}}"#,
                serde_json::Value::from(name)
            );
            assert!(
                matches!(config_error(&text), Some(Error::Configuration(_))),
                "{name} should be rejected"
            );
        }

        let config = Config::from_json_str(
            r#"{"targets": [{"name": "logging.v1", "source_address": "/subsystem=logging"}]}"#,
        )
        .expect("dotted stem is fine");
        assert_eq!(config.targets[0].name, "logging.v1");
    }

    #[test]
    fn test_validation_failures() {
        for text in [
            r#"{"targets": []}"#,
            r#"{"targets": [{"name": "", "source_address": "/subsystem=logging"}]}"#,
            r#"{"targets": [{"name": "a", "source_address": "/"}]}"#,
            r#"{"targets": [
                {"name": "a", "source_address": "/subsystem=logging"},
                {"name": "a", "source_address": "/subsystem=io"}
            ]}"#,
            r#"{"targets": [{"name": "a", "source_address": "/subsystem"}]}"#,
            r#"{"port": "high", "targets": []}"#,
        ] {
            assert!(
                matches!(config_error(text), Some(Error::Configuration(_))),
                "{text} should be rejected"
            );
        }
    }
}
