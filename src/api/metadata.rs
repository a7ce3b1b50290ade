//
//  redmine-cli
//  api/metadata.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Trackers, statuses, priorities and users.
//!
//! These are the lookup tables needed to fill in the numeric ids of an issue:
//! `tracker_id`, `status_id`, `priority_id` and `assigned_to_id`.

use serde::{Deserialize, Serialize};

/// User account status filter for `/users.json`.
pub mod user_status {
    pub const ACTIVE: u8 = 1;
    pub const REGISTERED: u8 = 2;
    pub const LOCKED: u8 = 3;
}

/// An issue type such as Bug or Feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tracker {
    pub id: u64,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub default_status: Option<super::common::NamedRef>,
}

/// An issue workflow status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueStatus {
    pub id: u64,

    pub name: String,

    /// Issues in a closed status count as done.
    #[serde(default)]
    pub is_closed: bool,
}

/// An issue priority from `/enumerations/issue_priorities.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Priority {
    pub id: u64,

    pub name: String,

    #[serde(default)]
    pub is_default: bool,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// A Redmine user account.
///
/// Listing users requires administrator rights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,

    #[serde(default)]
    pub login: String,

    #[serde(default)]
    pub firstname: String,

    #[serde(default)]
    pub lastname: String,

    #[serde(default)]
    pub mail: Option<String>,

    #[serde(default)]
    pub admin: bool,

    #[serde(default)]
    pub last_login_on: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_priority_defaults() {
        let p: Priority = serde_json::from_value(json!({"id": 2, "name": "Normal"})).unwrap();
        assert!(p.active);
        assert!(!p.is_default);
    }

    #[test]
    fn test_user_full_name() {
        let u: User = serde_json::from_value(json!({
            "id": 5,
            "login": "jdoe",
            "firstname": "Jane",
            "lastname": "Doe"
        }))
        .unwrap();
        assert_eq!(u.full_name(), "Jane Doe");

        let bare: User = serde_json::from_value(json!({"id": 6, "login": "bot"})).unwrap();
        assert_eq!(bare.full_name(), "");
    }
}
