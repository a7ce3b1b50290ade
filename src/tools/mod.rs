//
//  redmine-cli
//  tools/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Tool Handlers
//!
//! One stateless async function per Redmine operation. Each takes the shared
//! [`RedmineClient`] and a serde-deserializable argument struct, and returns
//! the JSON value Redmine answered with.
//!
//! ## Catalog
//!
//! [`Tool`] names every operation; [`dispatch`] decodes JSON arguments for a
//! named tool and runs its handler. The stdio server in [`serve`] and the
//! `redmine tools` command are both built on it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use redmine_cli::api::RedmineClient;
//! use redmine_cli::tools::dispatch;
//!
//! # async fn example(client: &RedmineClient) -> Result<(), redmine_cli::api::ApiError> {
//! let issues = dispatch(
//!     client,
//!     "list_issues",
//!     serde_json::json!({"project_id": "website", "status_id": "open"}),
//! )
//! .await?;
//! println!("{}", issues["total_count"]);
//! # Ok(())
//! # }
//! ```

pub mod files;
pub mod issues;
pub mod metadata;
pub mod projects;
pub mod relations;
pub mod serve;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::api::{ApiError, RedmineClient};

/// Every callable tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    ListProjects,
    GetProject,
    SearchProjects,
    GetProjectMembers,
    ListIssues,
    GetIssue,
    CreateIssue,
    UpdateIssue,
    DeleteIssue,
    CreateIssueRelation,
    DeleteIssueRelation,
    ListTrackers,
    ListIssueStatuses,
    ListPriorities,
    ListUsers,
    UploadFile,
    DownloadAttachment,
}

impl Tool {
    pub const ALL: [Tool; 17] = [
        Self::ListProjects,
        Self::GetProject,
        Self::SearchProjects,
        Self::GetProjectMembers,
        Self::ListIssues,
        Self::GetIssue,
        Self::CreateIssue,
        Self::UpdateIssue,
        Self::DeleteIssue,
        Self::CreateIssueRelation,
        Self::DeleteIssueRelation,
        Self::ListTrackers,
        Self::ListIssueStatuses,
        Self::ListPriorities,
        Self::ListUsers,
        Self::UploadFile,
        Self::DownloadAttachment,
    ];

    /// The name callers use to invoke the tool.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListProjects => "list_projects",
            Self::GetProject => "get_project",
            Self::SearchProjects => "search_projects",
            Self::GetProjectMembers => "get_project_members",
            Self::ListIssues => "list_issues",
            Self::GetIssue => "get_issue",
            Self::CreateIssue => "create_issue",
            Self::UpdateIssue => "update_issue",
            Self::DeleteIssue => "delete_issue",
            Self::CreateIssueRelation => "create_issue_relation",
            Self::DeleteIssueRelation => "delete_issue_relation",
            Self::ListTrackers => "list_trackers",
            Self::ListIssueStatuses => "list_issue_statuses",
            Self::ListPriorities => "list_priorities",
            Self::ListUsers => "list_users",
            Self::UploadFile => "upload_file",
            Self::DownloadAttachment => "download_attachment",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::ListProjects => "List accessible projects (limit, offset)",
            Self::GetProject => "Get a project by id or identifier (project_id)",
            Self::SearchProjects => "Search projects by name, identifier or description (query)",
            Self::GetProjectMembers => "List the members of a project (project_id)",
            Self::ListIssues => {
                "List issues (project_id, tracker_id, status_id, assigned_to_id, priority_id, limit, offset)"
            }
            Self::GetIssue => "Get an issue with journals, children, attachments and relations (issue_id)",
            Self::CreateIssue => "Create an issue (project_id, subject, optional fields)",
            Self::UpdateIssue => "Update an issue (issue_id, fields to change, notes)",
            Self::DeleteIssue => "Delete an issue (issue_id)",
            Self::CreateIssueRelation => {
                "Relate two issues (issue_id, issue_to_id, relation_type, delay)"
            }
            Self::DeleteIssueRelation => "Delete an issue relation (relation_id)",
            Self::ListTrackers => "List trackers",
            Self::ListIssueStatuses => "List issue statuses",
            Self::ListPriorities => "List issue priorities",
            Self::ListUsers => "List users (status, limit)",
            Self::UploadFile => "Upload a file and get an attachment token (file_path, filename)",
            Self::DownloadAttachment => "Download an attachment to disk (url, save_path)",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tool {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| ApiError::Validation(format!("Unknown tool: {s}")))
    }
}

/// Decodes the arguments of `tool`.
///
/// A missing (`null`) argument object is treated as `{}` so that tools whose
/// arguments all have defaults can be called bare.
pub fn parse_args<T: DeserializeOwned>(tool: Tool, arguments: Value) -> Result<T, ApiError> {
    let arguments = match arguments {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(arguments)
        .map_err(|e| ApiError::Validation(format!("Invalid arguments for {}: {}", tool.name(), e)))
}

/// Runs the tool called `name` with JSON `arguments`.
///
/// # Errors
///
/// - `Validation` for an unknown tool or undecodable arguments, before any
///   request is sent
/// - Whatever the handler returns otherwise
pub async fn dispatch(client: &RedmineClient, name: &str, arguments: Value) -> Result<Value, ApiError> {
    let tool: Tool = name.parse()?;
    tracing::debug!("Dispatching {}", tool);

    match tool {
        Tool::ListProjects => projects::list_projects(client, parse_args(tool, arguments)?).await,
        Tool::GetProject => projects::get_project(client, parse_args(tool, arguments)?).await,
        Tool::SearchProjects => projects::search_projects(client, parse_args(tool, arguments)?).await,
        Tool::GetProjectMembers => {
            projects::get_project_members(client, parse_args(tool, arguments)?).await
        }
        Tool::ListIssues => issues::list_issues(client, parse_args(tool, arguments)?).await,
        Tool::GetIssue => issues::get_issue(client, parse_args(tool, arguments)?).await,
        Tool::CreateIssue => issues::create_issue(client, parse_args(tool, arguments)?).await,
        Tool::UpdateIssue => issues::update_issue(client, parse_args(tool, arguments)?).await,
        Tool::DeleteIssue => issues::delete_issue(client, parse_args(tool, arguments)?).await,
        Tool::CreateIssueRelation => {
            relations::create_issue_relation(client, parse_args(tool, arguments)?).await
        }
        Tool::DeleteIssueRelation => {
            relations::delete_issue_relation(client, parse_args(tool, arguments)?).await
        }
        Tool::ListTrackers => metadata::list_trackers(client).await,
        Tool::ListIssueStatuses => metadata::list_issue_statuses(client).await,
        Tool::ListPriorities => metadata::list_priorities(client).await,
        Tool::ListUsers => metadata::list_users(client, parse_args(tool, arguments)?).await,
        Tool::UploadFile => files::upload_file(client, parse_args(tool, arguments)?).await,
        Tool::DownloadAttachment => {
            files::download_attachment(client, parse_args(tool, arguments)?).await
        }
    }
}
