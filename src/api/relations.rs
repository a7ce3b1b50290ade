//
//  redmine-cli
//  api/relations.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issue relation payloads and models.
//!
//! A relation is a typed, directed link from one issue to another. Redmine
//! stores some types together with their inverse, so creating `blocks` from
//! A to B shows up as `blocked` when viewed from B.
//!
//! # Relation Types
//!
//! * `relates` - Related to
//! * `duplicates` / `duplicated` - Duplicates / duplicated by
//! * `blocks` / `blocked` - Blocks / blocked by
//! * `precedes` / `follows` - Scheduling order, optionally with a delay in days
//! * `copied_to` / `copied_from` - Copy links
//!
//! Only `precedes` and `follows` accept a `delay`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::common::ApiError;

/// The kind of link between two issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    Relates,
    Duplicates,
    Duplicated,
    Blocks,
    Blocked,
    Precedes,
    Follows,
    CopiedTo,
    CopiedFrom,
}

impl RelationType {
    pub const ALL: [RelationType; 9] = [
        Self::Relates,
        Self::Duplicates,
        Self::Duplicated,
        Self::Blocks,
        Self::Blocked,
        Self::Precedes,
        Self::Follows,
        Self::CopiedTo,
        Self::CopiedFrom,
    ];

    /// The wire name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relates => "relates",
            Self::Duplicates => "duplicates",
            Self::Duplicated => "duplicated",
            Self::Blocks => "blocks",
            Self::Blocked => "blocked",
            Self::Precedes => "precedes",
            Self::Follows => "follows",
            Self::CopiedTo => "copied_to",
            Self::CopiedFrom => "copied_from",
        }
    }

    /// Returns `true` for the scheduling types that accept a delay.
    pub fn supports_delay(&self) -> bool {
        matches!(self, Self::Precedes | Self::Follows)
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|t| t.as_str()).collect();
                ApiError::Validation(format!(
                    "Invalid relation_type '{}'. Valid values are: {}",
                    s,
                    valid.join(", ")
                ))
            })
    }
}

/// Payload for `POST /issues/{id}/relations.json`.
///
/// # Example
///
/// ```rust
/// use redmine_cli::api::relations::NewRelation;
///
/// let relation = NewRelation::new(43, "precedes", Some(3))?;
/// assert_eq!(
///     serde_json::to_value(&relation).unwrap(),
///     serde_json::json!({"issue_to_id": 43, "relation_type": "precedes", "delay": 3})
/// );
///
/// assert!(NewRelation::new(43, "relates", Some(3)).is_err());
/// # Ok::<(), redmine_cli::api::ApiError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRelation {
    pub issue_to_id: u64,

    pub relation_type: RelationType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<i64>,
}

impl NewRelation {
    /// Validates the relation type and delay.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for an unknown type, or when a delay
    /// is given for a type other than `precedes`/`follows`.
    pub fn new(issue_to_id: u64, relation_type: &str, delay: Option<i64>) -> Result<Self, ApiError> {
        let relation_type: RelationType = relation_type.parse()?;
        if delay.is_some() && !relation_type.supports_delay() {
            return Err(ApiError::Validation(format!(
                "delay parameter is only valid for 'precedes' or 'follows' relations, not for '{relation_type}'"
            )));
        }
        Ok(Self {
            issue_to_id,
            relation_type,
            delay,
        })
    }
}

/// Wraps a relation payload under the `relation` root key.
#[derive(Debug, Serialize)]
pub struct RelationEnvelope<'a> {
    pub relation: &'a NewRelation,
}

/// A relation as returned by Redmine.
///
/// The type is kept as a string so that relation types added by newer
/// Redmine versions still deserialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relation {
    pub id: u64,

    pub issue_id: u64,

    pub issue_to_id: u64,

    pub relation_type: String,

    #[serde(default)]
    pub delay: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_all_types() {
        for t in RelationType::ALL {
            assert_eq!(t.as_str().parse::<RelationType>().unwrap(), t);
            assert_eq!(serde_json::to_value(t).unwrap(), json!(t.as_str()));
        }
    }

    #[test]
    fn test_unknown_type() {
        let err = "depends".parse::<RelationType>().unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(err.to_string().contains("Invalid relation_type 'depends'"));
        assert!(err.to_string().contains("copied_from"));
    }

    #[test]
    fn test_delay_only_for_scheduling() {
        assert!(NewRelation::new(2, "precedes", Some(3)).is_ok());
        assert!(NewRelation::new(2, "follows", Some(0)).is_ok());
        assert!(NewRelation::new(2, "blocks", None).is_ok());

        let err = NewRelation::new(2, "relates", Some(3)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "delay parameter is only valid for 'precedes' or 'follows' relations, not for 'relates'"
        );
    }

    #[test]
    fn test_envelope_body() {
        let relation = NewRelation::new(43, "copied_to", None).unwrap();
        let body = serde_json::to_value(RelationEnvelope {
            relation: &relation,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"relation": {"issue_to_id": 43, "relation_type": "copied_to"}})
        );
    }
}
