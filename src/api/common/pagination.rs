//
//  redmine-cli
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination for Redmine list endpoints
//!
//! Redmine collections use offset-based pagination. Every list response
//! carries `total_count`, `offset` and `limit` next to the resource array:
//!
//! ```json
//! {"issues": [...], "total_count": 120, "offset": 25, "limit": 25}
//! ```
//!
//! The server refuses to return more than 100 items per page, so requested
//! limits are capped at [`MAX_LIMIT`] before they are sent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::QueryParams;

/// Largest page size Redmine honours.
pub const MAX_LIMIT: u32 = 100;

/// Default page size for project and issue listings.
pub const DEFAULT_LIMIT: u32 = 25;

/// A limit/offset pair with the limit capped at [`MAX_LIMIT`].
///
/// # Example
///
/// ```rust
/// use redmine_cli::api::Pagination;
///
/// let page = Pagination::new(500, 0);
/// assert_eq!(page.limit(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    limit: u32,
    offset: u32,
}

impl Pagination {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: limit.min(MAX_LIMIT),
            offset,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Adds `limit` and `offset` to a parameter set.
    pub fn apply(&self, params: QueryParams) -> QueryParams {
        params.with("limit", self.limit).with("offset", self.offset)
    }

    /// The page following this one.
    pub fn next(&self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset.saturating_add(self.limit),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, 0)
    }
}

/// The paging envelope of a Redmine list response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub total_count: u64,

    #[serde(default)]
    pub offset: u64,

    #[serde(default)]
    pub limit: u64,
}

impl PageInfo {
    /// Reads the envelope fields from a list response, defaulting to zero.
    pub fn from_response(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_u64).unwrap_or(0);
        Self {
            total_count: field("total_count"),
            offset: field("offset"),
            limit: field("limit"),
        }
    }

    /// Returns `true` when items exist beyond this page.
    pub fn has_next(&self) -> bool {
        self.offset + self.limit < self.total_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_limit_is_capped() {
        assert_eq!(Pagination::new(100, 0).limit(), 100);
        assert_eq!(Pagination::new(101, 0).limit(), 100);
        assert_eq!(Pagination::new(10, 5).offset(), 5);
    }

    #[test]
    fn test_apply_and_next() {
        let page = Pagination::new(50, 0).next();
        let params = page.apply(QueryParams::new());
        assert_eq!(params.get("limit"), Some("50"));
        assert_eq!(params.get("offset"), Some("50"));
    }

    #[test]
    fn test_page_info() {
        let info = PageInfo::from_response(&json!({
            "projects": [],
            "total_count": 30,
            "offset": 0,
            "limit": 25
        }));
        assert!(info.has_next());

        let last = PageInfo::from_response(&json!({"total_count": 30, "offset": 25, "limit": 25}));
        assert!(!last.has_next());

        assert_eq!(PageInfo::from_response(&json!({})), PageInfo::default());
    }
}
