//
//  bitbucket-v1
//  api/models/repositories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository types.
//!
//! The v1 repository document, as returned by
//! `GET /repositories/{owner}/{slug}` and embedded in `/users/{name}`.

use serde::{Deserialize, Serialize};

/// Repository metadata.
///
/// # Fields
///
/// * `owner` - Account name of the owner (a plain string in v1)
/// * `slug` - URL-safe repository name
/// * `scm` - `git` or `hg`
/// * `has_issues` - Whether the issue tracker is enabled
///
/// # Example
///
/// ```rust
/// use bitbucket_v1::api::models::Repository;
///
/// let json = r#"{
///     "owner": "jdoe",
///     "slug": "tools",
///     "name": "Tools",
///     "scm": "git",
///     "is_private": true,
///     "has_issues": true
/// }"#;
///
/// let repo: Repository = serde_json::from_str(json).unwrap();
/// assert_eq!(repo.full_name(), "jdoe/tools");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub owner: String,

    pub slug: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub scm: Option<String>,

    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub website: Option<String>,

    #[serde(default)]
    pub is_private: bool,

    #[serde(default)]
    pub is_fork: bool,

    #[serde(default)]
    pub has_issues: bool,

    #[serde(default)]
    pub has_wiki: bool,

    /// Size in bytes.
    #[serde(default)]
    pub size: u64,

    #[serde(default)]
    pub created_on: Option<String>,

    #[serde(default)]
    pub utc_created_on: Option<String>,

    #[serde(default)]
    pub utc_last_updated: Option<String>,

    #[serde(default)]
    pub resource_uri: Option<String>,
}

impl Repository {
    /// `owner/slug`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.slug)
    }
}
