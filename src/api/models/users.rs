//
//  bitbucket-v1
//  api/models/users.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! User types.

use serde::{Deserialize, Serialize};

use super::Repository;

/// A Bitbucket account as embedded in other v1 documents
/// (`reported_by`, `responsible`, `author_info`, followers, ...).
///
/// # Example
///
/// ```rust
/// use bitbucket_v1::api::models::User;
///
/// let json = r#"{
///     "username": "jdoe",
///     "first_name": "Jane",
///     "last_name": "Doe",
///     "display_name": "Jane Doe",
///     "is_team": false,
///     "avatar": "https://bitbucket.org/account/jdoe/avatar/32/"
/// }"#;
///
/// let user: User = serde_json::from_str(json).unwrap();
/// assert_eq!(user.label(), "Jane Doe");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Account name used in URLs.
    pub username: String,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub display_name: Option<String>,

    /// `true` for team accounts.
    #[serde(default)]
    pub is_team: bool,

    /// Avatar image URL.
    #[serde(default)]
    pub avatar: Option<String>,

    /// API path of this user (e.g. `/1.0/users/jdoe`).
    #[serde(default)]
    pub resource_uri: Option<String>,
}

impl User {
    /// Display name when set and non-empty, otherwise the username.
    pub fn label(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.username,
        }
    }
}

/// The `/users/{username}` document: the account plus its visible
/// repositories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub user: User,

    #[serde(default)]
    pub repositories: Vec<Repository>,
}
