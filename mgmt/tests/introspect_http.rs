//! Schema discovery against a mock HTTP management endpoint

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use mgmt_model::{AddressTemplate, HttpManagementClient, SchemaIntrospector};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_single_composite_request_per_node() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/management"))
        .and(body_json(json!({
            "operation": "composite",
            "address": [],
            "steps": [
                {
                    "operation": "read-children-types",
                    "address": [{"subsystem": "logging"}],
                    "include-singletons": true
                },
                {
                    "operation": "read-resource-description",
                    "address": [{"subsystem": "logging"}, {"logging-profile": "LP1"}]
                }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "outcome": "success",
            "result": {
                "step-1": {
                    "outcome": "success",
                    "result": ["console-handler", "logging-profile=LP1", "logging-profile"]
                },
                "step-2": {
                    "outcome": "success",
                    "result": {
                        "description": "A logging profile",
                        "attributes": {},
                        "children": {}
                    }
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpManagementClient::with_base_url(&server.uri(), Some(5)).expect("client");
    let target = AddressTemplate::parse("/subsystem=logging/logging-profile=LP1").expect("template");

    let tree = SchemaIntrospector::new(client)
        .discover(&target)
        .await
        .expect("discovery");

    assert_eq!(tree.node_count(), 1);
    assert_eq!(tree.description().type_tag(), "logging-profile");
    assert_eq!(tree.description().singleton_name(), Some("LP1"));
    assert_eq!(tree.description().description(), Some("A logging profile"));
}
