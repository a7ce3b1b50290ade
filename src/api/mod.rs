//
//  redmine-cli
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the HTTP client for the Redmine REST API together with
//! the request payloads and response models used by the tool handlers.
//!
//! ## Architecture
//!
//! - [`client`]: Core HTTP client with API-key injection and status mapping
//! - [`transfer`]: Raw byte upload and redirect-following download
//! - [`common`]: Error taxonomy, query parameters, pagination, resource ids
//! - [`projects`], [`issues`], [`relations`], [`metadata`]: resource types
//!
//! ## Error Handling
//!
//! Every operation returns `Result<_, ApiError>`. HTTP failures map onto
//! variants by status code:
//!
//! - `AuthFailed`: 401 Unauthorized
//! - `Forbidden`: 403 Forbidden
//! - `NotFound`: 404 Not Found
//! - `ServerError`: 5xx Server Errors
//! - `Http`: any other status of 400 or above

/// Core HTTP client wrapper for the Redmine API.
pub mod client;

/// File upload and download helpers.
pub mod transfer;

/// Common types shared by every resource.
///
/// Includes:
/// - [`ApiError`]: Error taxonomy with optional HTTP status
/// - [`ErrorDescriptor`]: Serializable `{error, status_code}` form
/// - [`QueryParams`]: Sparse query parameter builder
/// - [`Pagination`]: Limit/offset pair capped at the server maximum
/// - [`ResourceId`]: Numeric id or string identifier
pub mod common;

/// Project and membership types.
pub mod projects;

/// Issue payloads and models.
pub mod issues;

/// Issue relation payloads and models.
pub mod relations;

/// Trackers, statuses, priorities and users.
pub mod metadata;

pub use client::RedmineClient;
pub use common::{ApiError, ErrorDescriptor, Pagination, QueryParams, ResourceId};
