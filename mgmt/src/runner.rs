//! Discovery runs over every configured target

use std::path::{Path, PathBuf};

use error_stack::Report;
use tracing::{info, warn};

use crate::client::ManagementClient;
use crate::config::GeneratorTarget;
use crate::error::{Error, Result};
use crate::schema::{ResourceMetaData, SchemaIntrospector};

/// A target that could not be discovered or written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFailure {
    /// Target name
    pub name:  String,
    /// Rendered error report
    pub error: String,
}

/// Outcome of one run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Files written, in target order
    pub written: Vec<PathBuf>,
    /// Targets that were skipped
    pub failed:  Vec<TargetFailure>,
}

impl RunSummary {
    /// Whether every target succeeded
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Discover each target in order and write `<output>/<name>.json`
///
/// A failed target is logged and skipped; the run continues with the next one. Only a
/// missing or uncreatable output directory fails the whole run.
pub async fn run_targets<C: ManagementClient>(
    introspector: &SchemaIntrospector<C>,
    targets: &[GeneratorTarget],
    output: &Path,
) -> Result<RunSummary> {
    std::fs::create_dir_all(output)
        .map_err(|e| Report::new(Error::io_failed("create output directory", output, e)))?;

    let mut summary = RunSummary::default();
    for target in targets {
        info!("Discovering {} at {}", target.name, target.source_address);

        let written = match introspector.discover(&target.source_address).await {
            Ok(tree) => write_tree(&tree, &output.join(format!("{}.json", target.name))),
            Err(report) => Err(report),
        };

        match written {
            Ok(path) => {
                info!("Wrote {}", path.display());
                summary.written.push(path);
            }
            Err(report) => {
                warn!("Skipping target {}: {report:?}", target.name);
                summary.failed.push(TargetFailure {
                    name:  target.name.clone(),
                    error: format!("{report:?}"),
                });
            }
        }
    }
    Ok(summary)
}

fn write_tree(tree: &ResourceMetaData, path: &Path) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(tree)
        .map_err(|e| Report::new(Error::io_failed("serialize schema for", path, e)))?;
    std::fs::write(path, json).map_err(|e| Report::new(Error::io_failed("write", path, e)))?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::address::AddressTemplate;
    use crate::client::InMemoryManagementClient;

    fn target(name: &str, address: &str) -> GeneratorTarget {
        GeneratorTarget {
            name:           name.to_string(),
            source_address: AddressTemplate::parse(address).expect("valid template"),
        }
    }

    #[tokio::test]
    async fn test_failed_target_is_skipped() {
        let client = InMemoryManagementClient::new()
            .with_children_types("/", &["subsystem=logging", "subsystem=io", "subsystem"])
            .with_description("/subsystem=logging", json!({"description": "logging"}))
            .with_description("/subsystem=io", json!({"description": "io"}))
            .with_failure("/subsystem=ee", "WFLYCTL0216: not found");
        let introspector = SchemaIntrospector::new(client);
        let output = tempfile::tempdir().expect("tempdir");

        let targets = [
            target("logging", "/subsystem=logging"),
            target("ee", "/subsystem=ee"),
            target("io", "/subsystem=io"),
        ];
        let summary = run_targets(&introspector, &targets, output.path())
            .await
            .expect("run completes");

        assert!(!summary.is_success());
        assert_eq!(summary.written.len(), 2);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].name, "ee");
        assert!(summary.failed[0].error.contains("WFLYCTL0216"));
        assert!(!output.path().join("ee.json").exists());

        let dump: Value = serde_json::from_str(
            &std::fs::read_to_string(output.path().join("logging.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(dump["address"], json!("/subsystem=logging"));
        assert_eq!(dump["description"]["singleton_name"], json!("logging"));
        assert_eq!(dump["children"], json!([]));
    }

    #[tokio::test]
    async fn test_output_directory_is_created() {
        let client = InMemoryManagementClient::new()
            .with_children_types("/", &["subsystem"])
            .with_description("/subsystem=io", json!({}));
        let introspector = SchemaIntrospector::new(client);
        let root = tempfile::tempdir().expect("tempdir");
        let output = root.path().join("nested").join("schemas");

        let summary = run_targets(&introspector, &[target("io", "/subsystem=io")], &output)
            .await
            .expect("run completes");

        assert!(summary.is_success());
        assert_eq!(summary.written, [output.join("io.json")]);
    }
}
