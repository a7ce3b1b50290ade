//
//  redmine-cli
//  tools/metadata.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Lookup tools for trackers, statuses, priorities and users.

use serde::Deserialize;
use serde_json::Value;

use crate::api::common::MAX_LIMIT;
use crate::api::metadata::user_status;
use crate::api::{ApiError, QueryParams, RedmineClient};

/// Lists trackers (Bug, Feature, Support...).
pub async fn list_trackers(client: &RedmineClient) -> Result<Value, ApiError> {
    client.get("/trackers.json", None).await
}

/// Lists issue statuses with their `is_closed` flag.
pub async fn list_issue_statuses(client: &RedmineClient) -> Result<Value, ApiError> {
    client.get("/issue_statuses.json", None).await
}

/// Lists issue priorities.
pub async fn list_priorities(client: &RedmineClient) -> Result<Value, ApiError> {
    client.get("/enumerations/issue_priorities.json", None).await
}

fn default_status() -> u8 {
    user_status::ACTIVE
}

fn default_user_limit() -> u32 {
    MAX_LIMIT
}

/// Arguments for `list_users`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListUsersArgs {
    /// 1 active, 2 registered, 3 locked.
    #[serde(default = "default_status")]
    pub status: u8,

    #[serde(default = "default_user_limit")]
    pub limit: u32,
}

impl Default for ListUsersArgs {
    fn default() -> Self {
        Self {
            status: user_status::ACTIVE,
            limit: MAX_LIMIT,
        }
    }
}

/// Lists user accounts. Requires administrator rights on the server.
pub async fn list_users(client: &RedmineClient, args: ListUsersArgs) -> Result<Value, ApiError> {
    let params = QueryParams::new()
        .with("status", args.status)
        .with("limit", args.limit);
    client.get("/users.json", Some(&params)).await
}
