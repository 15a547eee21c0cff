//
//  bitbucket-v1
//  api/models/issues.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issue tracker types.
//!
//! Bitbucket issues are a lightweight tracker built into each repository.
//! They carry a status, a priority and a kind, and can be assigned to a
//! user (`responsible`).
//!
//! # Issue Statuses
//!
//! * `new` - Newly created, not yet triaged
//! * `open` - Acknowledged and being worked on
//! * `resolved` - Fixed or addressed
//! * `on hold` - Temporarily paused
//! * `invalid` - Not a valid issue
//! * `duplicate` - Duplicate of another issue
//! * `wontfix` - Will not be fixed
//! * `closed` - Completed
//!
//! # Issue Priorities
//!
//! `trivial`, `minor`, `major`, `critical`, `blocker`
//!
//! # Issue Kinds
//!
//! `bug`, `enhancement`, `proposal`, `task`
//!
//! # Example
//!
//! ```rust
//! use bitbucket_v1::api::models::IssueRequest;
//!
//! let request = IssueRequest {
//!     title: Some("Login button not responding".to_string()),
//!     content: Some("Nothing happens when clicking Login.".to_string()),
//!     priority: Some("major".to_string()),
//!     kind: Some("bug".to_string()),
//!     ..Default::default()
//! };
//! ```

use serde::{Deserialize, Serialize};

use super::User;

/// Statuses accepted by the v1 issue tracker.
pub const ISSUE_STATUSES: &[&str] = &[
    "new", "open", "resolved", "on hold", "invalid", "duplicate", "wontfix", "closed",
];

/// Priorities accepted by the v1 issue tracker.
pub const ISSUE_PRIORITIES: &[&str] = &["trivial", "minor", "major", "critical", "blocker"];

/// Kinds accepted by the v1 issue tracker.
pub const ISSUE_KINDS: &[&str] = &["bug", "enhancement", "proposal", "task"];

/// Statuses that mark an issue as done.
pub const ISSUE_CLOSED_STATUSES: &[&str] = &["resolved", "closed", "invalid", "duplicate", "wontfix"];

/// An issue in a repository's tracker.
///
/// # Example
///
/// ```rust,no_run
/// use bitbucket_v1::api::models::Issue;
///
/// fn display_issue(issue: &Issue) {
///     println!("#{}: {} [{}]", issue.local_id, issue.title, issue.status);
///     println!("  Priority: {} | Kind: {}", issue.priority, issue.metadata.kind);
///     if let Some(reporter) = &issue.reported_by {
///         println!("  Reporter: {}", reporter.label());
///     }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number, sequential within the repository.
    pub local_id: u64,

    pub title: String,

    /// Raw description text.
    #[serde(default)]
    pub content: Option<String>,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub priority: String,

    #[serde(default)]
    pub metadata: IssueMetadata,

    /// The user who created this issue. Absent for anonymous reports.
    #[serde(default)]
    pub reported_by: Option<User>,

    /// The user assigned to the issue.
    #[serde(default)]
    pub responsible: Option<User>,

    #[serde(default)]
    pub created_on: Option<String>,

    #[serde(default)]
    pub utc_created_on: Option<String>,

    #[serde(default)]
    pub utc_last_updated: Option<String>,

    #[serde(default)]
    pub comment_count: u32,

    #[serde(default)]
    pub follower_count: u32,

    #[serde(default)]
    pub is_spam: bool,

    #[serde(default)]
    pub resource_uri: Option<String>,
}

/// Classification attached to an issue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueMetadata {
    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub component: Option<String>,

    #[serde(default)]
    pub milestone: Option<String>,

    #[serde(default)]
    pub version: Option<String>,
}

/// One page of a repository's issues, as returned by listing and search.
///
/// `count` is the total number of matching issues, not the page length.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Issues {
    #[serde(default)]
    pub count: u32,

    /// Filters the server applied, echoed back.
    #[serde(default)]
    pub filter: serde_json::Value,

    /// Search term the server applied, if any.
    #[serde(default)]
    pub search: Option<String>,

    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl Issues {
    /// Offset of the page after one fetched with `start`/`limit`, or `None`
    /// when that page reached the end of the result set.
    pub fn next_start(&self, start: u32, limit: u32) -> Option<u32> {
        let next = start.saturating_add(limit);
        if limit == 0 || next >= self.count {
            None
        } else {
            Some(next)
        }
    }
}

/// Users following an issue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Followers {
    #[serde(default)]
    pub count: u32,

    #[serde(default)]
    pub followers: Vec<User>,
}

/// Form fields for creating or updating an issue.
///
/// Every field is optional; only the fields that are set are sent. A create
/// needs at least `title`. Server defaults apply to the rest (`new`,
/// `major`, `bug`).
///
/// `responsible` is the assignee's username.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IssueRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl From<&Issue> for IssueRequest {
    /// Captures every writable field of an existing issue, so a fetched
    /// issue can be edited in place and sent back.
    fn from(issue: &Issue) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

        Self {
            title: Some(issue.title.clone()),
            content: issue.content.clone(),
            status: non_empty(&issue.status),
            priority: non_empty(&issue.priority),
            kind: non_empty(&issue.metadata.kind),
            responsible: issue.responsible.as_ref().map(|u| u.username.clone()),
            component: issue.metadata.component.clone(),
            milestone: issue.metadata.milestone.clone(),
            version: issue.metadata.version.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISSUE_JSON: &str = r#"{
        "status": "new",
        "priority": "major",
        "title": "Crash on save",
        "reported_by": {"username": "jdoe", "display_name": "Jane Doe"},
        "utc_last_updated": "2013-08-21 19:31:37+00:00",
        "comment_count": 2,
        "metadata": {"kind": "bug", "version": null, "component": "editor", "milestone": null},
        "content": "Steps...",
        "created_on": "2013-08-21T21:31:37.000",
        "local_id": 7,
        "follower_count": 1,
        "utc_created_on": "2013-08-21 19:31:37+00:00",
        "resource_uri": "/1.0/repositories/jdoe/tools/issues/7",
        "is_spam": false
    }"#;

    #[test]
    fn test_issue_deserializes_v1_document() {
        let issue: Issue = serde_json::from_str(ISSUE_JSON).unwrap();
        assert_eq!(issue.local_id, 7);
        assert_eq!(issue.metadata.kind, "bug");
        assert_eq!(issue.metadata.component.as_deref(), Some("editor"));
        assert!(issue.responsible.is_none());
        assert_eq!(issue.comment_count, 2);
    }

    #[test]
    fn test_request_from_issue_flattens_metadata() {
        let mut issue: Issue = serde_json::from_str(ISSUE_JSON).unwrap();
        issue.responsible = Some(User {
            username: "asmith".to_string(),
            ..Default::default()
        });

        let request = IssueRequest::from(&issue);
        assert_eq!(request.title.as_deref(), Some("Crash on save"));
        assert_eq!(request.kind.as_deref(), Some("bug"));
        assert_eq!(request.component.as_deref(), Some("editor"));
        assert_eq!(request.responsible.as_deref(), Some("asmith"));
        assert_eq!(request.version, None);
    }

    #[test]
    fn test_next_start() {
        let page = Issues {
            count: 40,
            ..Default::default()
        };
        assert_eq!(page.next_start(0, 15), Some(15));
        assert_eq!(page.next_start(15, 15), Some(30));
        assert_eq!(page.next_start(30, 15), None);
        assert_eq!(page.next_start(0, 0), None);
    }
}
