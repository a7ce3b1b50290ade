//
//  redmine-cli
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client Wrapper for the Redmine API
//!
//! This module provides the core HTTP client for interacting with Redmine.
//! It performs one authenticated request per call and normalizes the result.
//!
//! ## Features
//!
//! - `X-Redmine-API-Key` header injection
//! - JSON request bodies for POST/PUT
//! - Blank success bodies decoded as an empty object
//! - Status code mapping onto [`ApiError`]
//! - Transport failures classified as timeout, connect or network errors
//!
//! ## Notes
//!
//! Each call makes exactly one attempt. Redmine mutations such as issue
//! creation are not idempotent, so nothing here retries.

use std::time::Duration;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::common::{ApiError, QueryParams};
use crate::config::RedmineConfig;

/// Header carrying the Redmine API key on every request.
pub const API_KEY_HEADER: &str = "X-Redmine-API-Key";

/// Content type of JSON request bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// What a request was doing when it failed.
///
/// Redmine answers 404 and 422 with different meanings depending on the
/// endpoint, so status mapping needs to know which kind of call produced the
/// response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// A regular JSON API call.
    Api,
    /// A raw byte upload to `/uploads.json`.
    Upload,
    /// An attachment download.
    Download,
}

impl RequestKind {
    fn label(self) -> &'static str {
        match self {
            Self::Api => "Request",
            Self::Upload => "Upload",
            Self::Download => "Download",
        }
    }
}

/// Maps an error status code onto an [`ApiError`].
///
/// | Status | Api | Upload | Download |
/// |--------|-----|--------|----------|
/// | 401 | `AuthFailed` | same | same |
/// | 403 | `Forbidden` | same | same |
/// | 404 | "Resource not found." | "Upload endpoint not found." | "File not found on server." |
/// | 422 | `Http` with body | `UploadRejected` | `Http` |
/// | 5xx | `ServerError` | same | same |
/// | other | `Http` with body | `Http` with body | `Http`, "Download failed" |
///
/// # Example
///
/// ```rust
/// use redmine_cli::api::client::{map_status, RequestKind};
///
/// let err = map_status(409, "Conflict", RequestKind::Api);
/// assert_eq!(err.to_string(), "HTTP 409: Conflict");
/// assert_eq!(err.status_code(), Some(409));
/// ```
pub fn map_status(status: u16, body: &str, kind: RequestKind) -> ApiError {
    match status {
        401 => ApiError::AuthFailed,
        403 => ApiError::Forbidden,
        404 => ApiError::NotFound(
            match kind {
                RequestKind::Api => "Resource not found.",
                RequestKind::Upload => "Upload endpoint not found.",
                RequestKind::Download => "File not found on server.",
            }
            .to_string(),
        ),
        422 if kind == RequestKind::Upload => ApiError::UploadRejected,
        s if s >= 500 => ApiError::ServerError(s),
        s => ApiError::Http {
            status: s,
            body: match kind {
                RequestKind::Download => "Download failed".to_string(),
                _ => body.to_string(),
            },
        },
    }
}

/// Decodes a success body.
///
/// A blank or whitespace-only body becomes an empty JSON object; anything
/// else must parse as JSON.
///
/// ```rust
/// use redmine_cli::api::client::decode_body;
///
/// assert_eq!(decode_body("  \n").unwrap(), serde_json::json!({}));
/// assert_eq!(decode_body("[1]").unwrap(), serde_json::json!([1]));
/// assert!(decode_body("<html>").is_err());
/// ```
pub fn decode_body(text: &str) -> Result<Value, ApiError> {
    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    Ok(serde_json::from_str(text)?)
}

/// The HTTP client for the Redmine REST API.
///
/// Wraps one connection-pooling `reqwest::Client`. The client is `Send + Sync`
/// and every call is a self-contained exchange, so a single instance can be
/// shared (for example behind an `Arc`) by any number of concurrent callers.
///
/// # Example
///
/// ```rust,no_run
/// use redmine_cli::api::{QueryParams, RedmineClient};
/// use redmine_cli::config::RedmineConfig;
///
/// # async fn example() -> Result<(), redmine_cli::api::ApiError> {
/// let config = RedmineConfig::new("https://redmine.example.com", "secret")?;
/// let client = RedmineClient::new(&config)?;
///
/// let params = QueryParams::new().with("status_id", "open");
/// let issues = client.get("/issues.json", Some(&params)).await?;
/// println!("{} open issues", issues["total_count"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RedmineClient {
    /// The underlying HTTP client
    http: Client,
    /// Base URL without trailing slash
    base_url: String,
    /// Value of the `X-Redmine-API-Key` header
    api_key: String,
    /// Per-request timeout
    timeout: Duration,
}

impl RedmineClient {
    /// Creates a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unexpected`] if the TLS backend cannot be
    /// initialized.
    pub fn new(config: &RedmineConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Unexpected(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            api_key: config.api_key().to_string(),
            timeout: config.timeout(),
        })
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Classifies a transport failure.
    pub(crate) fn transport_error(
        &self,
        kind: RequestKind,
        url: &str,
        err: reqwest::Error,
    ) -> ApiError {
        if err.is_timeout() {
            tracing::warn!("{} to {} timed out", kind.label(), url);
            ApiError::Timeout {
                operation: kind.label(),
                seconds: self.timeout.as_secs(),
                source: err,
            }
        } else if err.is_connect() {
            tracing::warn!("Could not connect to {}: {}", url, err);
            ApiError::Connect {
                url: self.base_url.clone(),
                source: err,
            }
        } else {
            tracing::warn!("{} to {} failed: {}", kind.label(), url, err);
            ApiError::Network(err)
        }
    }

    /// Performs one request and normalizes the response.
    ///
    /// # Parameters
    ///
    /// * `method` - GET, POST, PUT or DELETE
    /// * `path` - Endpoint suffix appended to the base URL (e.g. `/issues.json`)
    /// * `query` - Optional query parameters; empty sets are not sent
    /// * `body` - Optional JSON body, only sent for POST and PUT
    ///
    /// # Returns
    ///
    /// The decoded JSON body, or an empty object when the body is blank.
    ///
    /// # Errors
    ///
    /// - Status 400 and above: mapped through [`map_status`]
    /// - Transport failures: `Timeout`, `Connect` or `Network`
    /// - Non-blank body that is not JSON: `Json`
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: Option<&QueryParams>,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let sends_body = method == Method::POST || method == Method::PUT;
        let mut request = self
            .http
            .request(method, &url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

        if let Some(query) = query.filter(|q| !q.is_empty()) {
            request = request.query(query.as_pairs());
        }

        if let Some(body) = body.filter(|_| sends_body) {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(RequestKind::Api, &url, e))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(RequestKind::Api, &url, e))?;

        if status.as_u16() >= 400 {
            tracing::debug!("{} returned {}", url, status);
            return Err(map_status(status.as_u16(), &text, RequestKind::Api));
        }

        decode_body(&text)
    }

    /// Makes a GET request.
    pub async fn get(&self, path: &str, query: Option<&QueryParams>) -> Result<Value, ApiError> {
        self.request(Method::GET, path, query, None).await
    }

    /// Makes a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Besides the errors of [`RedmineClient::request`], returns `Json` if the
    /// body cannot be serialized.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, None, Some(&body)).await
    }

    /// Makes a PUT request with a JSON body.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = serde_json::to_value(body)?;
        self.request(Method::PUT, path, None, Some(&body)).await
    }

    /// Makes a DELETE request.
    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::DELETE, path, None, None).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    pub(crate) fn client_for(server: &mockito::ServerGuard) -> RedmineClient {
        let config = RedmineConfig::new(&server.url(), "test-key").unwrap();
        RedmineClient::new(&config).unwrap()
    }

    #[test]
    fn test_map_status_templates() {
        assert!(matches!(
            map_status(401, "", RequestKind::Api),
            ApiError::AuthFailed
        ));
        assert_eq!(
            map_status(403, "", RequestKind::Api).to_string(),
            "Access forbidden. Please check your permissions."
        );
        assert_eq!(
            map_status(404, "", RequestKind::Api).to_string(),
            "Resource not found."
        );
        assert_eq!(
            map_status(500, "boom", RequestKind::Api).to_string(),
            "Redmine server error: 500"
        );
        assert_eq!(
            map_status(422, "{\"errors\":[\"Subject cannot be blank\"]}", RequestKind::Api)
                .to_string(),
            "HTTP 422: {\"errors\":[\"Subject cannot be blank\"]}"
        );
    }

    #[test]
    fn test_map_status_keeps_code() {
        for status in [400u16, 401, 403, 404, 405, 409, 422, 429, 500, 502, 503, 599] {
            for kind in [RequestKind::Api, RequestKind::Upload, RequestKind::Download] {
                assert_eq!(map_status(status, "", kind).status_code(), Some(status));
            }
        }
    }

    #[test]
    fn test_map_status_per_kind() {
        assert_eq!(
            map_status(404, "", RequestKind::Upload).to_string(),
            "Upload endpoint not found."
        );
        assert!(matches!(
            map_status(422, "", RequestKind::Upload),
            ApiError::UploadRejected
        ));
        assert_eq!(
            map_status(404, "", RequestKind::Download).to_string(),
            "File not found on server."
        );
        assert_eq!(
            map_status(410, "gone", RequestKind::Download).to_string(),
            "HTTP 410: Download failed"
        );
    }

    #[tokio::test]
    async fn test_get_sends_api_key_and_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/issues.json")
            .match_header("x-redmine-api-key", "test-key")
            .match_header("content-type", "application/json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("status_id".into(), "*".into()),
                Matcher::UrlEncoded("limit".into(), "5".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"issues":[{"id":1}],"total_count":1}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let params = QueryParams::new().with("status_id", "*").with("limit", 5);
        let value = client.get("/issues.json", Some(&params)).await.unwrap();

        assert_eq!(value["total_count"], 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_blank_body_is_empty_object() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/issues/1.json")
            .with_status(204)
            .with_body("")
            .create_async()
            .await;
        server
            .mock("DELETE", "/relations/9.json")
            .with_status(200)
            .with_body("  \n ")
            .create_async()
            .await;

        let client = client_for(&server);
        let put = client
            .put("/issues/1.json", &json!({"issue": {"subject": "x"}}))
            .await
            .unwrap();
        assert_eq!(put, json!({}));

        let deleted = client.delete("/relations/9.json").await.unwrap();
        assert_eq!(deleted, json!({}));
    }

    #[tokio::test]
    async fn test_invalid_json_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/projects.json")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.get("/projects.json", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Json(_)));
        assert_eq!(err.status_code(), None);
    }

    #[tokio::test]
    async fn test_error_status_mapping() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/projects/1.json")
            .with_status(401)
            .create_async()
            .await;
        server
            .mock("GET", "/projects/2.json")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/projects/3.json")
            .with_status(502)
            .create_async()
            .await;
        server
            .mock("POST", "/issues.json")
            .with_status(422)
            .with_body(r#"{"errors":["Subject cannot be blank"]}"#)
            .create_async()
            .await;

        let client = client_for(&server);

        let err = client.get("/projects/1.json", None).await.unwrap_err();
        assert!(matches!(err, ApiError::AuthFailed));
        assert_eq!(err.status_code(), Some(401));

        let err = client.get("/projects/2.json", None).await.unwrap_err();
        assert_eq!(err.to_string(), "Resource not found.");

        let err = client.get("/projects/3.json", None).await.unwrap_err();
        assert_eq!(err.to_string(), "Redmine server error: 502");
        assert_eq!(err.status_code(), Some(502));

        let err = client
            .post("/issues.json", &json!({"issue": {}}))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"HTTP 422: {"errors":["Subject cannot be blank"]}"#
        );
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/issues.json")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"issue": {"project_id": 1, "subject": "Hi"}})))
            .with_status(201)
            .with_body(r#"{"issue":{"id":10}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let value = client
            .post("/issues.json", &json!({"issue": {"project_id": 1, "subject": "Hi"}}))
            .await
            .unwrap();
        assert_eq!(value["issue"]["id"], 10);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_connection_failure() {
        let config = RedmineConfig::new("http://127.0.0.1:1", "key").unwrap();
        let client = RedmineClient::new(&config).unwrap();

        let err = client.get("/projects.json", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Connect { .. }));
        assert_eq!(err.to_string(), "Failed to connect to Redmine at http://127.0.0.1:1");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[tokio::test]
    async fn test_timeout_keeps_source() {
        // Accepted by the kernel backlog but never answered
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let config = RedmineConfig::new(&format!("http://{addr}"), "key")
            .unwrap()
            .with_timeout(Duration::from_secs(1));
        let client = RedmineClient::new(&config).unwrap();

        let err = client.get("/issues.json", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Timeout { operation: "Request", seconds: 1, .. }));
        assert_eq!(err.to_string(), "Request timeout after 1 seconds");
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.status_code(), None);
        drop(listener);
    }

    #[tokio::test]
    async fn test_concurrent_calls_do_not_interfere() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/trackers.json")
            .with_status(200)
            .with_body(r#"{"trackers":[{"id":1,"name":"Bug"}]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/issue_statuses.json")
            .with_status(200)
            .with_body(r#"{"issue_statuses":[{"id":1,"name":"New"}]}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let (trackers, statuses) = tokio::join!(
            client.get("/trackers.json", None),
            client.get("/issue_statuses.json", None)
        );

        let trackers = trackers.unwrap();
        let statuses = statuses.unwrap();
        assert_eq!(trackers["trackers"][0]["name"], "Bug");
        assert!(trackers.get("issue_statuses").is_none());
        assert_eq!(statuses["issue_statuses"][0]["name"], "New");
        assert!(statuses.get("trackers").is_none());
    }
}
