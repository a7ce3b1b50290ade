//
//  redmine-cli
//  api/issues.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issue payloads and models.
//!
//! This module provides the request payloads for creating and updating
//! issues, and the response model rendered by the command line.
//!
//! # Sparse payloads
//!
//! Redmine treats a field that is absent from an update as "leave unchanged"
//! and a field that is present as "set", even when the value is empty. Every
//! optional field is therefore an `Option` that is skipped when `None`, so the
//! serialized body only carries what the caller asked to change:
//!
//! ```rust
//! use redmine_cli::api::issues::{IssueAttributes, IssueUpdate};
//!
//! let update = IssueUpdate {
//!     notes: Some("Deployed to staging".into()),
//!     attributes: IssueAttributes {
//!         done_ratio: Some(80),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//!
//! let body = serde_json::to_value(&update).unwrap();
//! assert_eq!(body, serde_json::json!({"done_ratio": 80, "notes": "Deployed to staging"}));
//! ```
//!
//! # Local validation
//!
//! Payloads are validated before any request is sent:
//!
//! - `done_ratio` must be within 0..=100
//! - `estimated_hours` must be finite and not negative
//! - `start_date` and `due_date` must be `YYYY-MM-DD` calendar dates
//! - an update must change at least one field

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{ApiError, NamedRef, ResourceId};
use super::relations::Relation;

/// Associated data requested when fetching a single issue.
pub const ISSUE_INCLUDES: &str = "journals,children,attachments,relations";

/// A custom field value.
///
/// `value` is a string for single-value fields and an array of strings for
/// multi-value fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFieldValue {
    pub id: u64,
    pub value: Value,
}

/// A previously uploaded file to attach to an issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRef {
    /// Token returned by `/uploads.json`.
    pub token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The optional issue fields shared by create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracker_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u64>,

    /// Target version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_version_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_issue_id: Option<u64>,

    /// `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    /// `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,

    /// Progress percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done_ratio: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watcher_user_ids: Option<Vec<u64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Vec<CustomFieldValue>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploads: Option<Vec<UploadRef>>,
}

impl IssueAttributes {
    /// Checks the field ranges and date formats.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for the first offending field.
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(ratio) = self.done_ratio {
            if !(0..=100).contains(&ratio) {
                return Err(ApiError::Validation(
                    "done_ratio must be between 0 and 100".to_string(),
                ));
            }
        }
        if let Some(hours) = self.estimated_hours {
            if !hours.is_finite() || hours < 0.0 {
                return Err(ApiError::Validation(
                    "estimated_hours must be non-negative".to_string(),
                ));
            }
        }
        validate_date("start_date", self.start_date.as_deref())?;
        validate_date("due_date", self.due_date.as_deref())?;
        Ok(())
    }

    /// Returns `true` when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn validate_date(field: &str, value: Option<&str>) -> Result<(), ApiError> {
    match value {
        Some(date) if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() => {
            Err(ApiError::Validation(format!(
                "{field} must be a date in YYYY-MM-DD format, got '{date}'"
            )))
        }
        _ => Ok(()),
    }
}

/// Payload for `POST /issues.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewIssue {
    pub project_id: ResourceId,

    pub subject: String,

    #[serde(flatten)]
    pub attributes: IssueAttributes,
}

impl NewIssue {
    /// Builds a validated creation payload.
    ///
    /// An empty description is dropped rather than sent.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] if an attribute is out of range.
    ///
    /// # Example
    ///
    /// ```rust
    /// use redmine_cli::api::issues::{IssueAttributes, NewIssue};
    ///
    /// let attributes = IssueAttributes {
    ///     done_ratio: Some(101),
    ///     ..Default::default()
    /// };
    /// assert!(NewIssue::new(1.into(), "Broken login", attributes).is_err());
    /// ```
    pub fn new(
        project_id: ResourceId,
        subject: impl Into<String>,
        mut attributes: IssueAttributes,
    ) -> Result<Self, ApiError> {
        if attributes.description.as_deref() == Some("") {
            attributes.description = None;
        }
        attributes.validate()?;
        Ok(Self {
            project_id,
            subject: subject.into(),
            attributes,
        })
    }
}

/// Payload for `PUT /issues/{id}.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(flatten)]
    pub attributes: IssueAttributes,

    /// Comment added to the issue history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_notes: Option<bool>,
}

impl IssueUpdate {
    /// Checks that something changes and that every set field is valid.
    pub fn validate(&self) -> Result<(), ApiError> {
        self.attributes.validate()?;
        if self.is_empty() {
            return Err(ApiError::Validation(
                "At least one field must be specified for update".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.subject.is_none()
            && self.notes.is_none()
            && self.private_notes.is_none()
            && self.attributes.is_empty()
    }
}

/// Wraps an issue payload under the `issue` root key.
#[derive(Debug, Serialize)]
pub struct IssueEnvelope<'a, T: Serialize> {
    pub issue: &'a T,
}

/// A journal entry (comment or change set) on an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    pub id: u64,

    #[serde(default)]
    pub user: Option<NamedRef>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub created_on: Option<String>,

    #[serde(default)]
    pub private_notes: bool,
}

/// A file attached to an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: u64,

    pub filename: String,

    #[serde(default)]
    pub filesize: u64,

    #[serde(default)]
    pub content_type: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Download URL, possibly redirecting to external storage.
    #[serde(default)]
    pub content_url: Option<String>,

    #[serde(default)]
    pub author: Option<NamedRef>,
}

/// A direct subtask of an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildIssue {
    pub id: u64,

    #[serde(default)]
    pub tracker: Option<NamedRef>,

    #[serde(default)]
    pub subject: String,
}

/// A Redmine issue as returned by `/issues.json` and `/issues/{id}.json`.
///
/// The collections are only populated when requested through `include`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,

    pub project: NamedRef,

    pub tracker: NamedRef,

    pub status: NamedRef,

    pub priority: NamedRef,

    #[serde(default)]
    pub author: Option<NamedRef>,

    #[serde(default)]
    pub assigned_to: Option<NamedRef>,

    #[serde(default)]
    pub category: Option<NamedRef>,

    #[serde(default)]
    pub fixed_version: Option<NamedRef>,

    #[serde(default)]
    pub parent: Option<ParentRef>,

    pub subject: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub start_date: Option<String>,

    #[serde(default)]
    pub due_date: Option<String>,

    #[serde(default)]
    pub done_ratio: Option<u32>,

    #[serde(default)]
    pub estimated_hours: Option<f64>,

    #[serde(default)]
    pub is_private: Option<bool>,

    #[serde(default)]
    pub created_on: Option<String>,

    #[serde(default)]
    pub updated_on: Option<String>,

    #[serde(default)]
    pub journals: Vec<Journal>,

    #[serde(default)]
    pub attachments: Vec<Attachment>,

    #[serde(default)]
    pub relations: Vec<Relation>,

    #[serde(default)]
    pub children: Vec<ChildIssue>,
}

/// Reference to a parent issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentRef {
    pub id: u64,
}

impl Issue {
    /// Name of the assignee, or an empty string.
    pub fn assignee_name(&self) -> &str {
        self.assigned_to
            .as_ref()
            .map(|a| a.name.as_str())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_ratio(ratio: i32) -> IssueAttributes {
        IssueAttributes {
            done_ratio: Some(ratio),
            ..Default::default()
        }
    }

    fn with_hours(hours: f64) -> IssueAttributes {
        IssueAttributes {
            estimated_hours: Some(hours),
            ..Default::default()
        }
    }

    #[test]
    fn test_done_ratio_bounds() {
        assert!(with_ratio(0).validate().is_ok());
        assert!(with_ratio(100).validate().is_ok());

        let err = with_ratio(101).validate().unwrap_err();
        assert_eq!(err.to_string(), "done_ratio must be between 0 and 100");
        assert!(with_ratio(-1).validate().is_err());
    }

    #[test]
    fn test_estimated_hours_bounds() {
        assert!(with_hours(0.0).validate().is_ok());
        assert!(with_hours(2.5).validate().is_ok());

        let err = with_hours(-0.5).validate().unwrap_err();
        assert_eq!(err.to_string(), "estimated_hours must be non-negative");
        assert!(with_hours(f64::NAN).validate().is_err());
        assert!(with_hours(f64::INFINITY).validate().is_err());
        assert!(with_hours(f64::NEG_INFINITY).validate().is_err());
    }

    #[test]
    fn test_date_format() {
        let ok = IssueAttributes {
            start_date: Some("2024-02-29".into()),
            due_date: Some("2024-03-15".into()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let bad = IssueAttributes {
            due_date: Some("15/03/2024".into()),
            ..Default::default()
        };
        let err = bad.validate().unwrap_err();
        assert!(err.to_string().starts_with("due_date must be a date"));

        let impossible = IssueAttributes {
            start_date: Some("2023-02-30".into()),
            ..Default::default()
        };
        assert!(impossible.validate().is_err());
    }

    #[test]
    fn test_new_issue_body() {
        let issue = NewIssue::new(
            ResourceId::Id(1),
            "Login fails",
            IssueAttributes {
                description: Some(String::new()),
                tracker_id: Some(2),
                watcher_user_ids: Some(vec![4, 5]),
                custom_fields: Some(vec![CustomFieldValue {
                    id: 7,
                    value: json!("Chrome"),
                }]),
                ..Default::default()
            },
        )
        .unwrap();

        let body = serde_json::to_value(IssueEnvelope { issue: &issue }).unwrap();
        assert_eq!(
            body,
            json!({
                "issue": {
                    "project_id": 1,
                    "subject": "Login fails",
                    "tracker_id": 2,
                    "watcher_user_ids": [4, 5],
                    "custom_fields": [{"id": 7, "value": "Chrome"}]
                }
            })
        );
    }

    #[test]
    fn test_new_issue_with_identifier_and_upload() {
        let issue = NewIssue::new(
            "website".parse::<ResourceId>().unwrap(),
            "Add logo",
            IssueAttributes {
                uploads: Some(vec![UploadRef {
                    token: "7.abc".into(),
                    filename: Some("logo.png".into()),
                    content_type: Some("image/png".into()),
                    description: None,
                }]),
                ..Default::default()
            },
        )
        .unwrap();

        let body = serde_json::to_value(&issue).unwrap();
        assert_eq!(body["project_id"], "website");
        assert_eq!(
            body["uploads"],
            json!([{"token": "7.abc", "filename": "logo.png", "content_type": "image/png"}])
        );
    }

    #[test]
    fn test_update_must_change_something() {
        let err = IssueUpdate::default().validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "At least one field must be specified for update"
        );

        let private_only = IssueUpdate {
            private_notes: Some(false),
            ..Default::default()
        };
        assert!(private_only.validate().is_ok());
    }

    #[test]
    fn test_update_keeps_empty_description() {
        let update = IssueUpdate {
            attributes: IssueAttributes {
                description: Some(String::new()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(update.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"description": ""})
        );
    }

    #[test]
    fn test_issue_model() {
        let issue: Issue = serde_json::from_value(json!({
            "id": 42,
            "project": {"id": 1, "name": "Website"},
            "tracker": {"id": 1, "name": "Bug"},
            "status": {"id": 2, "name": "In Progress"},
            "priority": {"id": 3, "name": "High"},
            "assigned_to": {"id": 5, "name": "Jane Doe"},
            "subject": "Login fails",
            "done_ratio": 40,
            "journals": [{"id": 1, "user": {"id": 5, "name": "Jane Doe"}, "notes": "Looking"}],
            "relations": [{"id": 9, "issue_id": 42, "issue_to_id": 43, "relation_type": "blocks"}]
        }))
        .unwrap();

        assert_eq!(issue.assignee_name(), "Jane Doe");
        assert_eq!(issue.journals.len(), 1);
        assert_eq!(issue.relations[0].issue_to_id, 43);
        assert!(issue.attachments.is_empty());
    }
}
