//! HTTP client for the management endpoint
//!
//! Posts the JSON form of an operation to `http://<host>:<port>/management` and returns
//! the response node. Failed operations come back from the server as HTTP errors with a
//! JSON body; their failure description is surfaced in the transport error.

use std::time::Duration;

use async_trait::async_trait;
use error_stack::Report;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::ManagementClient;
use crate::constants::{
    DEFAULT_HOST, DEFAULT_MANAGEMENT_PORT, FAILURE_DESCRIPTION, MANAGEMENT_HTTP_PROTOCOL,
    MANAGEMENT_PATH, OP,
};
use crate::error::{Error, Result};

/// Connection settings for [`HttpManagementClient`]
///
/// Credentials are sent with HTTP basic authentication. A stock server whose HTTP
/// management interface only offers digest authentication answers 401, which surfaces as a
/// transport error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Management host
    #[serde(default = "default_host")]
    pub host:         String,
    /// HTTP management port
    #[serde(default = "default_port")]
    pub port:         u16,
    /// User for basic authentication
    #[serde(default)]
    pub username:     Option<String>,
    /// Password for basic authentication
    #[serde(default)]
    pub password:     Option<String>,
    /// Per-request timeout; none by default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

const fn default_port() -> u16 {
    DEFAULT_MANAGEMENT_PORT
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host:         default_host(),
            port:         default_port(),
            username:     None,
            password:     None,
            timeout_secs: None,
        }
    }
}

/// Management client over HTTP
#[derive(Debug, Clone)]
pub struct HttpManagementClient {
    client:   reqwest::Client,
    url:      String,
    username: Option<String>,
    password: Option<String>,
}

impl HttpManagementClient {
    /// Create a client for `config`
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = format!(
            "{MANAGEMENT_HTTP_PROTOCOL}://{}:{}",
            config.host, config.port
        );
        let mut client = Self::with_base_url(&base_url, config.timeout_secs)?;
        client.username.clone_from(&config.username);
        client.password.clone_from(&config.password);
        Ok(client)
    }

    /// Create an unauthenticated client for a base URL such as `http://localhost:9990`
    pub fn with_base_url(base_url: &str, timeout_secs: Option<u64>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| Report::new(Error::transport_failed("create HTTP client", e)))?;

        Ok(Self {
            client,
            url: format!("{}{MANAGEMENT_PATH}", base_url.trim_end_matches('/')),
            username: None,
            password: None,
        })
    }

    /// Endpoint URL requests are posted to
    pub fn url(&self) -> &str {
        &self.url
    }

    fn operation_name(operation: &Value) -> &str {
        operation.get(OP).and_then(Value::as_str).unwrap_or("unknown")
    }

    /// Map a non-success HTTP status to a transport error, preferring the server's
    /// failure description when the body carries one
    fn status_error(&self, operation: &str, status: reqwest::StatusCode, body: &str) -> Report<Error> {
        warn!("Management request failed - operation={operation}, status={status}");

        let failure = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|node| node.get(FAILURE_DESCRIPTION).cloned())
            .map(|failure| {
                failure
                    .as_str()
                    .map_or_else(|| failure.to_string(), str::to_string)
            });

        let details = failure.unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error")
            )
        });

        Report::new(Error::transport_failed(&format!("execute {operation}"), details))
            .attach(format!("URL: {}", self.url))
            .attach(format!("HTTP status: {status}"))
    }

    fn send_error(&self, operation: &str, e: &reqwest::Error) -> Report<Error> {
        warn!("Management request failed - operation={operation}, error={e}");

        let error_type = if e.is_timeout() {
            "Timeout"
        } else if e.is_connect() {
            "Connection failed"
        } else if e.is_request() {
            "Request error"
        } else if e.is_body() {
            "Body error"
        } else {
            "Unknown error type"
        };

        Report::new(Error::transport_failed(
            &format!("send {operation}"),
            format!("{error_type}: {e}"),
        ))
        .attach(format!("URL: {}", self.url))
    }
}

#[async_trait]
impl ManagementClient for HttpManagementClient {
    async fn execute(&self, operation: Value) -> Result<Value> {
        let name = Self::operation_name(&operation).to_string();
        debug!("Management request - {operation}");

        let mut request = self.client.post(&self.url).json(&operation);
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_ref());
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.send_error(&name, &e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.send_error(&name, &e))?;

        if !status.is_success() {
            return Err(self.status_error(&name, status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!("Management response is not JSON - operation={name}, error={e}");
            Report::new(Error::transport_failed("parse management response", e))
                .attach(format!("URL: {}", self.url))
                .attach(format!(
                    "Response body (first 500 chars): {}",
                    body.chars().take(500).collect::<String>()
                ))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> HttpManagementClient {
        HttpManagementClient::with_base_url(&server.uri(), Some(5))
            .unwrap_or_else(|e| panic!("client: {e:?}"))
    }

    #[test]
    fn test_url_from_config() {
        let config = ClientConfig {
            host: "mgmt.example.com".to_string(),
            port: 19990,
            ..ClientConfig::default()
        };
        let client = HttpManagementClient::new(&config).unwrap_or_else(|e| panic!("{e:?}"));
        assert_eq!(client.url(), "http://mgmt.example.com:19990/management");
    }

    #[tokio::test]
    async fn test_execute_posts_operation_json() {
        let server = MockServer::start().await;
        let operation = json!({"operation": "read-children-types", "address": []});

        Mock::given(method("POST"))
            .and(path("/management"))
            .and(header("content-type", "application/json"))
            .and(body_json(operation.clone()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"outcome": "success", "result": ["subsystem"]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server).execute(operation).await.ok();
        assert_eq!(
            response,
            Some(json!({"outcome": "success", "result": ["subsystem"]}))
        );
    }

    #[tokio::test]
    async fn test_failure_description_surfaces_in_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/management"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "outcome": "failed",
                "failure-description": "WFLYCTL0030: No resource definition is registered",
                "rolled-back": true
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .execute(json!({"operation": "read-resource-description", "address": []}))
            .await
            .err();

        match err.as_ref().map(Report::current_context) {
            Some(Error::Transport(message)) => {
                assert!(message.contains("WFLYCTL0030"), "{message}");
                assert!(message.contains("read-resource-description"), "{message}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unauthorized_without_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("<html>401</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).execute(json!({"operation": "composite"})).await.err();

        match err.as_ref().map(Report::current_context) {
            Some(Error::Transport(message)) => assert!(message.contains("HTTP 401"), "{message}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_basic_auth_sent_when_configured() {
        let server = MockServer::start().await;

        // admin:secret
        Mock::given(method("POST"))
            .and(header("authorization", "Basic YWRtaW46c2VjcmV0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"outcome": "success"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = client_for(&server);
        client.username = Some("admin".to_string());
        client.password = Some("secret".to_string());

        assert!(client.execute(json!({"operation": "whoami"})).await.is_ok());
    }
}
