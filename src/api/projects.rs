//
//  redmine-cli
//  api/projects.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project and membership types.
//!
//! Tool handlers return the raw JSON from Redmine; these types are the typed
//! view the command line renders from it.
//!
//! # Example
//!
//! ```rust
//! use redmine_cli::api::projects::Project;
//!
//! let project: Project = serde_json::from_value(serde_json::json!({
//!     "id": 1,
//!     "name": "Website",
//!     "identifier": "website",
//!     "status": 1
//! })).unwrap();
//!
//! assert!(project.matches("WEB"));
//! assert_eq!(project.status_label(), "active");
//! ```

use serde::{Deserialize, Serialize};

use super::common::NamedRef;

/// A Redmine project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,

    pub name: String,

    /// URL-safe identifier, usable wherever a project id is accepted.
    pub identifier: String,

    #[serde(default)]
    pub description: Option<String>,

    /// 1 active, 5 closed, 9 archived.
    #[serde(default)]
    pub status: Option<u8>,

    #[serde(default)]
    pub is_public: Option<bool>,

    #[serde(default)]
    pub parent: Option<NamedRef>,

    #[serde(default)]
    pub homepage: Option<String>,

    #[serde(default)]
    pub created_on: Option<String>,

    #[serde(default)]
    pub updated_on: Option<String>,
}

impl Project {
    /// Case-insensitive substring match over name, identifier and description.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.identifier.to_lowercase().contains(&query)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&query))
    }

    pub fn status_label(&self) -> &'static str {
        match self.status {
            Some(1) => "active",
            Some(5) => "closed",
            Some(9) => "archived",
            _ => "unknown",
        }
    }
}

/// A user or group membership in a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub id: u64,

    #[serde(default)]
    pub project: Option<NamedRef>,

    /// Set for user memberships.
    #[serde(default)]
    pub user: Option<NamedRef>,

    /// Set for group memberships.
    #[serde(default)]
    pub group: Option<NamedRef>,

    #[serde(default)]
    pub roles: Vec<NamedRef>,
}

impl Membership {
    /// Name of the member, whether a user or a group.
    pub fn member_name(&self) -> &str {
        self.user
            .as_ref()
            .or(self.group.as_ref())
            .map(|r| r.name.as_str())
            .unwrap_or("")
    }

    /// Comma-separated role names.
    pub fn role_names(&self) -> String {
        self.roles
            .iter()
            .map(|r| r.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project(description: Option<&str>) -> Project {
        serde_json::from_value(json!({
            "id": 3,
            "name": "Mobile App",
            "identifier": "mobile-app",
            "description": description,
        }))
        .unwrap()
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let p = project(Some("Android and iOS clients"));
        assert!(p.matches("mobile"));
        assert!(p.matches("APP"));
        assert!(p.matches("ios"));
        assert!(!p.matches("desktop"));
    }

    #[test]
    fn test_matches_without_description() {
        let p = project(None);
        assert!(p.matches("mobile-app"));
        assert!(!p.matches("android"));
        assert_eq!(p.status_label(), "unknown");
    }

    #[test]
    fn test_membership_names() {
        let m: Membership = serde_json::from_value(json!({
            "id": 1,
            "project": {"id": 1, "name": "Website"},
            "group": {"id": 9, "name": "Developers"},
            "roles": [{"id": 3, "name": "Manager"}, {"id": 4, "name": "Developer"}]
        }))
        .unwrap();
        assert_eq!(m.member_name(), "Developers");
        assert_eq!(m.role_names(), "Manager, Developer");
    }
}
