//
//  redmine-cli
//  tools/issues.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issue tools.
//!
//! Every handler validates its arguments before the first request is sent,
//! so a rejected call never reaches the server.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::api::common::DEFAULT_LIMIT;
use crate::api::issues::{IssueAttributes, IssueEnvelope, IssueUpdate, NewIssue, ISSUE_INCLUDES};
use crate::api::{ApiError, Pagination, QueryParams, RedmineClient, ResourceId};

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn all_statuses() -> String {
    "*".to_string()
}

/// Accepts `2` as well as `"2"` or `"open"`.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s,
    })
}

/// Arguments for `list_issues`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListIssuesArgs {
    #[serde(default)]
    pub project_id: Option<ResourceId>,

    #[serde(default)]
    pub tracker_id: Option<u64>,

    /// `open`, `closed`, `*` or a status id, as a number or a string.
    #[serde(default = "all_statuses", deserialize_with = "string_or_number")]
    pub status_id: String,

    /// A user id, or `me`.
    #[serde(default)]
    pub assigned_to_id: Option<ResourceId>,

    #[serde(default)]
    pub priority_id: Option<u64>,

    #[serde(default = "default_limit")]
    pub limit: u32,

    #[serde(default)]
    pub offset: u32,
}

impl Default for ListIssuesArgs {
    fn default() -> Self {
        Self {
            project_id: None,
            tracker_id: None,
            status_id: all_statuses(),
            assigned_to_id: None,
            priority_id: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl ListIssuesArgs {
    /// Builds the query string, leaving out unset filters.
    pub fn to_params(&self) -> QueryParams {
        let params = QueryParams::new()
            .with("status_id", &self.status_id)
            .with_opt("project_id", self.project_id.as_ref())
            .with_opt("tracker_id", self.tracker_id)
            .with_opt("assigned_to_id", self.assigned_to_id.as_ref())
            .with_opt("priority_id", self.priority_id);
        Pagination::new(self.limit, self.offset).apply(params)
    }
}

/// Lists issues matching the given filters.
pub async fn list_issues(client: &RedmineClient, args: ListIssuesArgs) -> Result<Value, ApiError> {
    client.get("/issues.json", Some(&args.to_params())).await
}

/// Arguments for tools addressing a single issue.
#[derive(Debug, Clone, Deserialize)]
pub struct GetIssueArgs {
    pub issue_id: u64,
}

/// Fetches one issue with its journals, children, attachments and relations.
pub async fn get_issue(client: &RedmineClient, args: GetIssueArgs) -> Result<Value, ApiError> {
    let params = QueryParams::new().with("include", ISSUE_INCLUDES);
    client
        .get(&format!("/issues/{}.json", args.issue_id), Some(&params))
        .await
}

/// Arguments for `create_issue`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIssueArgs {
    pub project_id: ResourceId,

    pub subject: String,

    #[serde(flatten)]
    pub attributes: IssueAttributes,
}

/// Creates an issue and returns Redmine's response, which includes the new id.
pub async fn create_issue(client: &RedmineClient, args: CreateIssueArgs) -> Result<Value, ApiError> {
    let issue = NewIssue::new(args.project_id, args.subject, args.attributes)?;
    tracing::debug!("Creating issue in project {}", issue.project_id);
    client
        .post("/issues.json", &IssueEnvelope { issue: &issue })
        .await
}

/// Arguments for `update_issue`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateIssueArgs {
    pub issue_id: u64,

    #[serde(flatten)]
    pub changes: IssueUpdate,
}

/// Updates an issue and returns its current state.
///
/// Redmine answers a successful update with an empty body, in which case the
/// issue is fetched again so the caller always receives a populated object.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] without sending anything when no field is
/// set or a field is out of range.
pub async fn update_issue(client: &RedmineClient, args: UpdateIssueArgs) -> Result<Value, ApiError> {
    args.changes.validate()?;

    let path = format!("/issues/{}.json", args.issue_id);
    let response = client
        .put(&path, &IssueEnvelope {
            issue: &args.changes,
        })
        .await?;

    if is_empty_response(&response) {
        tracing::debug!("Empty update response, fetching issue {}", args.issue_id);
        return client.get(&path, None).await;
    }
    Ok(response)
}

/// Deletes an issue.
pub async fn delete_issue(client: &RedmineClient, args: GetIssueArgs) -> Result<Value, ApiError> {
    client
        .delete(&format!("/issues/{}.json", args.issue_id))
        .await
}

fn is_empty_response(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
