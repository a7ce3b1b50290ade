//
//  redmine-cli
//  tools/projects.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project tools: listing, lookup, search and memberships.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::common::{PageInfo, DEFAULT_LIMIT, MAX_LIMIT};
use crate::api::projects::Project;
use crate::api::{ApiError, Pagination, QueryParams, RedmineClient, ResourceId};

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Arguments for `list_projects`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListProjectsArgs {
    /// Page size, capped at 100.
    #[serde(default = "default_limit")]
    pub limit: u32,

    #[serde(default)]
    pub offset: u32,
}

impl Default for ListProjectsArgs {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Lists accessible projects.
pub async fn list_projects(client: &RedmineClient, args: ListProjectsArgs) -> Result<Value, ApiError> {
    let params = Pagination::new(args.limit, args.offset).apply(QueryParams::new());
    client.get("/projects.json", Some(&params)).await
}

/// Arguments for tools addressing a single project.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectArgs {
    /// Numeric id or string identifier.
    pub project_id: ResourceId,
}

/// Fetches one project.
pub async fn get_project(client: &RedmineClient, args: ProjectArgs) -> Result<Value, ApiError> {
    client
        .get(&format!("/projects/{}.json", args.project_id), None)
        .await
}

/// Lists the user and group memberships of a project.
pub async fn get_project_members(client: &RedmineClient, args: ProjectArgs) -> Result<Value, ApiError> {
    client
        .get(&format!("/projects/{}/memberships.json", args.project_id), None)
        .await
}

/// Arguments for `search_projects`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchProjectsArgs {
    pub query: String,
}

/// Searches projects by name, identifier or description.
///
/// Redmine has no project search endpoint, so every page of `/projects.json`
/// is fetched and filtered locally with a case-insensitive substring match.
///
/// # Returns
///
/// `{"projects": [...], "total_count": n, "query": "..."}`
pub async fn search_projects(client: &RedmineClient, args: SearchProjectsArgs) -> Result<Value, ApiError> {
    let query = args.query.trim();
    if query.is_empty() {
        return Err(ApiError::Validation("query must not be empty".to_string()));
    }

    let mut page = Pagination::new(MAX_LIMIT, 0);
    let mut matches = Vec::new();

    loop {
        let params = page.apply(QueryParams::new());
        let response = client.get("/projects.json", Some(&params)).await?;

        let projects = response
            .get("projects")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let fetched = projects.len();

        matches.extend(projects.into_iter().filter(|p| {
            serde_json::from_value::<Project>(p.clone())
                .map(|project| project.matches(query))
                .unwrap_or(false)
        }));

        let info = PageInfo::from_response(&response);
        if fetched == 0 || !info.has_next() {
            break;
        }
        page = page.next();
    }

    tracing::debug!("{} projects matched '{}'", matches.len(), query);

    Ok(json!({
        "total_count": matches.len(),
        "projects": matches,
        "query": query,
    }))
}
