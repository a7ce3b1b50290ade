//
//  redmine-cli
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the Redmine client
//!
//! This module provides shared types used by the HTTP client, the transfer
//! helpers and every tool handler.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all operations
//! - [`ErrorDescriptor`] - The `{error, status_code}` shape reported to callers
//! - [`QueryParams`] - Query parameters that only carry the fields that are set
//! - [`ResourceId`] - A numeric id or a string identifier
//! - Pagination types (re-exported from [`pagination`] submodule)
//!
//! # Example
//!
//! ```rust
//! use redmine_cli::api::common::ApiError;
//!
//! fn describe(result: Result<(), ApiError>) -> String {
//!     match result {
//!         Ok(()) => "ok".to_string(),
//!         Err(ApiError::AuthFailed) => "check your API key".to_string(),
//!         Err(e) => format!("{} (status {:?})", e, e.status_code()),
//!     }
//! }
//! ```

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::exit_codes;

mod pagination;

pub use pagination::*;

/// Unified error type for all Redmine operations.
///
/// Every variant renders a human-readable message through `Display`; variants
/// that originate from an HTTP response also carry the status code, exposed
/// through [`ApiError::status_code`].
///
/// # Variants
///
/// | Variant | Description | HTTP Status |
/// |---------|-------------|-------------|
/// | `Config` | Required setting missing or invalid | N/A |
/// | `AuthFailed` | Invalid API key | 401 |
/// | `Forbidden` | Insufficient permissions | 403 |
/// | `NotFound` | Resource, upload endpoint or file missing | 404 |
/// | `UploadRejected` | Upload refused, usually by size limit | 422 |
/// | `ServerError` | Redmine failed internally | 5xx |
/// | `Http` | Any other error status | 4xx |
/// | `Validation` | Rejected locally before any request | N/A |
/// | `Timeout` / `Connect` / `Network` | Transport failures | N/A |
/// | `Json` | Body or payload is not valid JSON | N/A |
/// | File variants | Local file-system failures | N/A |
///
/// # Notes
///
/// - Transport variants keep the underlying `reqwest::Error` as `source()`
/// - No variant implies a retry; callers decide
#[derive(Error, Debug)]
pub enum ApiError {
    /// A required setting is missing or invalid.
    #[error("{0}")]
    Config(String),

    /// The server rejected the API key (HTTP 401).
    #[error("Authentication failed. Please check your API key.")]
    AuthFailed,

    /// The API key lacks permission for the operation (HTTP 403).
    #[error("Access forbidden. Please check your permissions.")]
    Forbidden,

    /// The server answered 404.
    ///
    /// The message depends on what was being accessed: a resource, the upload
    /// endpoint, or a file to download.
    #[error("{0}")]
    NotFound(String),

    /// The upload endpoint answered 422.
    #[error(
        "File upload failed. The file may exceed the maximum allowed size configured on the Redmine server."
    )]
    UploadRejected,

    /// The server answered with a 5xx status.
    #[error("Redmine server error: {0}")]
    ServerError(u16),

    /// Any other status of 400 or above.
    #[error("HTTP {status}: {body}")]
    Http {
        /// The response status code
        status: u16,
        /// The raw response body, or a short description
        body: String,
    },

    /// Arguments rejected locally before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// The single attempt exceeded the configured timeout.
    #[error("{operation} timeout after {seconds} seconds")]
    Timeout {
        /// "Request", "Upload" or "Download"
        operation: &'static str,
        /// The configured timeout
        seconds: u64,
        #[source]
        source: reqwest::Error,
    },

    /// The connection to the server could not be established.
    #[error("Failed to connect to Redmine at {url}")]
    Connect {
        /// The URL that was being contacted
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Any other transport-level failure.
    #[error("HTTP error occurred: {0}")]
    Network(#[source] reqwest::Error),

    /// A response body or request payload that is not valid JSON.
    #[error("Unexpected error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file to upload does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The path to upload exists but is not a regular file.
    #[error("Not a file: {}", .0.display())]
    NotAFile(PathBuf),

    /// The file to upload could not be read.
    #[error("Failed to read file: {source}")]
    ReadFile {
        /// The file being read
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The parent directory of a download target could not be created.
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        /// The directory being created
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The downloaded content could not be written.
    #[error("Failed to save file: {source}")]
    WriteFile {
        /// The file being written
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Anything not otherwise classified.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ApiError {
    /// Returns the HTTP status code this error originated from, if any.
    ///
    /// # Example
    ///
    /// ```rust
    /// use redmine_cli::api::ApiError;
    ///
    /// assert_eq!(ApiError::AuthFailed.status_code(), Some(401));
    /// assert_eq!(ApiError::ServerError(502).status_code(), Some(502));
    /// assert_eq!(ApiError::Validation("bad".into()).status_code(), None);
    /// ```
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::AuthFailed => Some(401),
            Self::Forbidden => Some(403),
            Self::NotFound(_) => Some(404),
            Self::UploadRejected => Some(422),
            Self::ServerError(status) => Some(*status),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` for errors raised before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Validation(_) | Self::FileNotFound(_) | Self::NotAFile(_)
        )
    }

    /// Maps the error onto a process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => exit_codes::CONFIG_ERROR,
            Self::AuthFailed | Self::Forbidden => exit_codes::AUTH_ERROR,
            Self::NotFound(_) | Self::FileNotFound(_) => exit_codes::NOT_FOUND,
            Self::Validation(_) => exit_codes::USAGE,
            _ => exit_codes::ERROR,
        }
    }
}

/// The error shape reported across the tool protocol boundary.
///
/// Library code never builds this directly; it is produced from an
/// [`ApiError`] at the point where a result leaves the process.
///
/// ```rust
/// use redmine_cli::api::{ApiError, ErrorDescriptor};
///
/// let descriptor = ErrorDescriptor::from(&ApiError::Forbidden);
/// assert_eq!(descriptor.status_code, Some(403));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    /// Human-readable cause.
    pub error: String,

    /// The originating HTTP status, or `null`.
    pub status_code: Option<u16>,
}

impl From<&ApiError> for ErrorDescriptor {
    fn from(err: &ApiError) -> Self {
        Self {
            error: err.to_string(),
            status_code: err.status_code(),
        }
    }
}

/// Query parameters for a request.
///
/// Only the parameters that were explicitly set are sent; an unset optional
/// filter is omitted rather than sent as an empty or null value.
///
/// # Example
///
/// ```rust
/// use redmine_cli::api::QueryParams;
///
/// let params = QueryParams::new()
///     .with("status_id", "*")
///     .with_opt("tracker_id", Some(2))
///     .with_opt::<u64>("priority_id", None);
///
/// assert_eq!(params.get("tracker_id"), Some("2"));
/// assert_eq!(params.get("priority_id"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing any earlier value.
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key.to_string(), value)),
        }
        self
    }

    /// Sets `key` only when `value` is present.
    pub fn with_opt<T: ToString>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Returns the value set for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Key/value pairs in insertion order, ready for `RequestBuilder::query`.
    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

/// A Redmine resource reference.
///
/// Projects can be addressed by numeric id or by their string identifier
/// (`my-project`), and some filters accept keywords such as `me`. Both forms
/// render unchanged into paths and query strings.
///
/// ```rust
/// use redmine_cli::api::ResourceId;
///
/// assert_eq!("42".parse::<ResourceId>().unwrap(), ResourceId::Id(42));
/// assert_eq!(
///     "my-project".parse::<ResourceId>().unwrap(),
///     ResourceId::Identifier("my-project".into())
/// );
/// assert_eq!(ResourceId::Id(7).to_string(), "7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ResourceId {
    /// Numeric database id.
    Id(u64),
    /// String identifier or keyword.
    Identifier(String),
}

/// Longest identifier Redmine accepts.
const MAX_IDENTIFIER_LEN: usize = 100;

impl ResourceId {
    /// Parses a numeric id or checks an identifier against Redmine's
    /// identifier charset (lowercase letters, digits, `-` and `_`).
    ///
    /// Identifiers are interpolated into request paths, so anything that
    /// could add a path segment is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for an empty, too long or malformed
    /// identifier.
    pub fn parse(s: &str) -> Result<Self, ApiError> {
        if let Ok(id) = s.parse::<u64>() {
            return Ok(Self::Id(id));
        }
        let valid = !s.is_empty()
            && s.len() <= MAX_IDENTIFIER_LEN
            && s
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_');
        if !valid {
            return Err(ApiError::Validation(format!(
                "Invalid identifier '{s}': use a numeric id or lowercase letters, digits, '-' and '_'"
            )));
        }
        Ok(Self::Identifier(s.to_string()))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Identifier(identifier) => f.write_str(identifier),
        }
    }
}

impl FromStr for ResourceId {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawResourceId {
    Id(u64),
    Text(String),
}

impl TryFrom<RawResourceId> for ResourceId {
    type Error = ApiError;

    fn try_from(raw: RawResourceId) -> Result<Self, Self::Error> {
        match raw {
            RawResourceId::Id(id) => Ok(Self::Id(id)),
            RawResourceId::Text(text) => Self::parse(&text),
        }
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawResourceId::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// A `{id, name}` reference embedded in Redmine responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: u64,

    #[serde(default)]
    pub name: String,
}
